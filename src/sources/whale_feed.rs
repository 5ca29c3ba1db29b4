//! Whale-alert RSS feed client
//!
//! Pulls the whale-alert account feed from a Nitter mirror (no login, no
//! API key) and extracts item titles published inside the recency window.
//! Items with a missing or malformed `pubDate` are skipped.

use super::{AlertFeed, AlertLine};
use crate::config::FeedConfig;
use crate::error::{DigestError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;

pub struct WhaleAlertFeed {
    http: Client,
    nitter_instance: String,
    account: String,
}

impl WhaleAlertFeed {
    pub fn new(config: &FeedConfig) -> Self {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            http,
            nitter_instance: config.nitter_instance.trim_end_matches('/').to_string(),
            account: config.account.clone(),
        }
    }
}

#[async_trait]
impl AlertFeed for WhaleAlertFeed {
    async fn recent_alerts(&self, now: DateTime<Utc>, window_hours: i64) -> Result<Vec<AlertLine>> {
        let url = format!("{}/{}/rss", self.nitter_instance, self.account);

        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(DigestError::Feed(format!(
                "alert feed returned {}",
                resp.status()
            )));
        }

        let body = resp.text().await?;
        let cutoff = now - Duration::hours(window_hours);
        Ok(extract_feed_items(&body, cutoff))
    }
}

/// Extract `<item>` titles published at or after `cutoff`, in feed order.
fn extract_feed_items(xml: &str, cutoff: DateTime<Utc>) -> Vec<AlertLine> {
    let mut items = Vec::new();
    let mut rest = xml;

    while let Some(open) = rest.find("<item>") {
        let body_start = open + "<item>".len();
        let Some(close) = rest[body_start..].find("</item>") else {
            break;
        };
        let block = &rest[body_start..body_start + close];

        if let (Some(title), Some(pub_date)) =
            (tag_content(block, "title"), tag_content(block, "pubDate"))
        {
            if let Ok(published) = DateTime::parse_from_rfc2822(pub_date.trim()) {
                let published = published.with_timezone(&Utc);
                if published >= cutoff {
                    items.push(AlertLine {
                        text: decode_entities(&title),
                        published_at: published,
                    });
                }
            }
        }

        rest = &rest[body_start + close + "</item>".len()..];
    }

    items
}

fn tag_content<'a>(block: &'a str, tag: &str) -> Option<&'a str> {
    let start_tag = format!("<{}>", tag);
    let end_tag = format!("</{}>", tag);

    let start = block.find(&start_tag)? + start_tag.len();
    let end = block[start..].find(&end_tag)?;
    Some(&block[start..start + end])
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
