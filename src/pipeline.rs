//! Single-run digest pipeline
//!
//! Orchestrates one invocation: the three data acquisitions run concurrently
//! with individual timeouts, each degrading to missing/empty on failure, then
//! the pure stages (parse, filter, classify, score, render) assemble the
//! report. Scoring never observes a partial fetch: all inputs are resolved or
//! degraded before assembly starts.

use crate::config::Config;
use crate::error::Result;
use crate::filter::MaterialTransferFilter;
use crate::interpreter::FlowMetricInterpreter;
use crate::parser;
use crate::report::ReportRenderer;
use crate::scorer::SentimentScorer;
use crate::sources::{AlertFeed, AlertLine, MetricSource};
use crate::types::{Report, TransferEvent};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Coin Metrics identifier for BTC exchange outflow (outflow-positive).
pub const BTC_FLOW_METRIC: &str = "FlowOutExNtv";
/// Coin Metrics identifier for USDT on-chain supply.
pub const USDT_SUPPLY_METRIC: &str = "SupplyNtv";

const BTC_FLOW_DAYS: i64 = 3;
const USDT_SUPPLY_DAYS: i64 = 1;

pub struct Pipeline {
    metrics: Arc<dyn MetricSource>,
    feed: Arc<dyn AlertFeed>,
    filter: MaterialTransferFilter,
    scorer: SentimentScorer,
    renderer: ReportRenderer,
    metric_timeout: Duration,
    feed_timeout: Duration,
    window_hours: i64,
}

impl Pipeline {
    pub fn new(metrics: Arc<dyn MetricSource>, feed: Arc<dyn AlertFeed>, config: &Config) -> Self {
        Self {
            metrics,
            feed,
            filter: MaterialTransferFilter::new(),
            scorer: SentimentScorer::new(),
            renderer: ReportRenderer::new(),
            metric_timeout: Duration::from_secs(config.metrics.timeout_secs),
            feed_timeout: Duration::from_secs(config.feed.timeout_secs),
            window_hours: config.feed.window_hours,
        }
    }

    /// Run one digest cycle at the supplied generation time.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<Report> {
        info!("Starting digest run at {}", now.format("%Y-%m-%d %H:%M"));

        let (btc_samples, usdt_samples, alerts) = tokio::join!(
            self.fetch_series(BTC_FLOW_METRIC, "btc", BTC_FLOW_DAYS, now),
            self.fetch_series(USDT_SUPPLY_METRIC, "usdt", USDT_SUPPLY_DAYS, now),
            self.fetch_alerts(now),
        );

        Ok(self.assemble(now, btc_samples, usdt_samples, &alerts))
    }

    /// Fetch one metric series, degrading any failure to no-data.
    async fn fetch_series(
        &self,
        metric: &str,
        asset: &str,
        days: i64,
        now: DateTime<Utc>,
    ) -> Option<Vec<f64>> {
        let fetch = self.metrics.series(metric, asset, days, now);
        match tokio::time::timeout(self.metric_timeout, fetch).await {
            Ok(Ok(series)) => series,
            Ok(Err(e)) => {
                warn!("Metric fetch {}/{} failed: {}", asset, metric, e);
                None
            }
            Err(_) => {
                warn!("Metric fetch {}/{} timed out", asset, metric);
                None
            }
        }
    }

    /// Fetch recent alert lines, degrading any failure to an empty list.
    async fn fetch_alerts(&self, now: DateTime<Utc>) -> Vec<AlertLine> {
        let fetch = self.feed.recent_alerts(now, self.window_hours);
        match tokio::time::timeout(self.feed_timeout, fetch).await {
            Ok(Ok(alerts)) => alerts,
            Ok(Err(e)) => {
                warn!("Alert feed fetch failed: {}", e);
                Vec::new()
            }
            Err(_) => {
                warn!("Alert feed fetch timed out");
                Vec::new()
            }
        }
    }

    /// Pure assembly: classify, parse, filter, score, render.
    pub fn assemble(
        &self,
        now: DateTime<Utc>,
        btc_samples: Option<Vec<f64>>,
        usdt_samples: Option<Vec<f64>>,
        alerts: &[AlertLine],
    ) -> Report {
        let btc_flow = FlowMetricInterpreter::net_flow("BTC exchange net flow (3d)", "BTC")
            .classify(btc_samples.as_deref());
        let usdt_supply = FlowMetricInterpreter::supply_delta("USDT supply change (24h)", "M")
            .classify(usdt_samples.as_deref());

        let events: Vec<TransferEvent> = alerts
            .iter()
            .filter_map(|alert| {
                let parsed = parser::parse_line(&alert.text, alert.published_at);
                if parsed.is_none() {
                    debug!("Skipping unparseable alert line: {}", alert.text);
                }
                parsed
            })
            .collect();
        let alarming = self.filter.filter(events);

        let verdict = self.scorer.score(&btc_flow, &usdt_supply, &alarming);
        info!(
            "Digest scored {} ({:?}), {} alarming events",
            verdict.score,
            verdict.label,
            alarming.len()
        );

        self.renderer
            .render(now, &btc_flow, &usdt_supply, &alarming, verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DigestError;
    use crate::types::SentimentLabel;
    use async_trait::async_trait;

    /// In-memory metric source returning canned series per metric name.
    struct StaticMetrics {
        btc: Option<Vec<f64>>,
        usdt: Option<Vec<f64>>,
    }

    #[async_trait]
    impl MetricSource for StaticMetrics {
        async fn series(
            &self,
            metric: &str,
            _asset: &str,
            _days: i64,
            _end: DateTime<Utc>,
        ) -> crate::error::Result<Option<Vec<f64>>> {
            match metric {
                BTC_FLOW_METRIC => Ok(self.btc.clone()),
                USDT_SUPPLY_METRIC => Ok(self.usdt.clone()),
                other => Err(DigestError::Api(format!("unknown metric {}", other))),
            }
        }
    }

    /// Metric source that always fails, simulating a network outage.
    struct FailingMetrics;

    #[async_trait]
    impl MetricSource for FailingMetrics {
        async fn series(
            &self,
            _metric: &str,
            _asset: &str,
            _days: i64,
            _end: DateTime<Utc>,
        ) -> crate::error::Result<Option<Vec<f64>>> {
            Err(DigestError::Api("connection refused".to_string()))
        }
    }

    struct StaticFeed {
        lines: Vec<&'static str>,
    }

    #[async_trait]
    impl AlertFeed for StaticFeed {
        async fn recent_alerts(
            &self,
            now: DateTime<Utc>,
            _window_hours: i64,
        ) -> crate::error::Result<Vec<AlertLine>> {
            Ok(self
                .lines
                .iter()
                .map(|l| AlertLine {
                    text: l.to_string(),
                    published_at: now,
                })
                .collect())
        }
    }

    struct FailingFeed;

    #[async_trait]
    impl AlertFeed for FailingFeed {
        async fn recent_alerts(
            &self,
            _now: DateTime<Utc>,
            _window_hours: i64,
        ) -> crate::error::Result<Vec<AlertLine>> {
            Err(DigestError::Feed("mirror down".to_string()))
        }
    }

    fn test_config() -> Config {
        // Deserialization path keeps the serde defaults in play.
        serde_json::from_value(serde_json::json!({
            "telegram": { "bot_token": "t", "chat_id": "c" }
        }))
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        "2026-08-30T08:00:00Z".parse().unwrap()
    }

    #[tokio::test]
    async fn test_bullish_run() {
        // Strong BTC outflow, large USDT mint, quiet whales.
        let metrics = Arc::new(StaticMetrics {
            btc: Some(vec![2e11, 2e11, 2e11]),
            usdt: Some(vec![1_000.0e6, 1_600.0e6]),
        });
        let feed = Arc::new(StaticFeed { lines: vec![] });
        let pipeline = Pipeline::new(metrics, feed, &test_config());

        let report = pipeline.run(now()).await.unwrap();
        assert_eq!(report.verdict.score, 3);
        assert_eq!(report.verdict.label, SentimentLabel::Bullish);
        assert!(report.sections[3].contains("no unusual large inflows"));
    }

    #[tokio::test]
    async fn test_whale_inflow_suppresses_point() {
        let metrics = Arc::new(StaticMetrics {
            btc: Some(vec![4_000.0, 3_500.0, 4_200.0]),
            usdt: Some(vec![1_000.0e6, 1_002.0e6]),
        });
        let feed = Arc::new(StaticFeed {
            lines: vec![
                "1,500 #BTC (75,000,000 USD) transferred from unknown wallet to #binance",
            ],
        });
        let pipeline = Pipeline::new(metrics, feed, &test_config());

        let report = pipeline.run(now()).await.unwrap();
        // Stable flows, one alarming event: nothing scores.
        assert_eq!(report.verdict.score, 0);
        assert_eq!(report.verdict.label, SentimentLabel::Bearish);
        assert!(report.sections[3].contains("75,000,000 USD"));
    }

    #[tokio::test]
    async fn test_all_sources_failing_still_renders() {
        let pipeline = Pipeline::new(
            Arc::new(FailingMetrics),
            Arc::new(FailingFeed),
            &test_config(),
        );

        let report = pipeline.run(now()).await.unwrap();
        assert_eq!(report.verdict.score, 1);
        assert_eq!(report.verdict.label, SentimentLabel::Mixed);
        assert_eq!(report.sections.len(), 5);
        assert!(report.sections[1].contains("data unavailable"));
        assert!(report.sections[2].contains("data unavailable"));
    }

    #[tokio::test]
    async fn test_unparseable_lines_are_skipped() {
        let metrics = Arc::new(StaticMetrics {
            btc: None,
            usdt: None,
        });
        let feed = Arc::new(StaticFeed {
            lines: vec!["something moved somewhere, no amount attached"],
        });
        let pipeline = Pipeline::new(metrics, feed, &test_config());

        let report = pipeline.run(now()).await.unwrap();
        assert!(report.sections[3].contains("no unusual large inflows"));
        assert_eq!(report.verdict.score, 1);
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let pipeline = Pipeline::new(
            Arc::new(FailingMetrics),
            Arc::new(FailingFeed),
            &test_config(),
        );
        let alerts = vec![AlertLine {
            text: "1,500 #BTC (75,000,000 USD) transferred to #binance".to_string(),
            published_at: now(),
        }];

        let a = pipeline
            .assemble(now(), Some(vec![1.0, 2.0]), None, &alerts)
            .to_text();
        let b = pipeline
            .assemble(now(), Some(vec![1.0, 2.0]), None, &alerts)
            .to_text();
        assert_eq!(a, b);
    }

    #[test]
    fn test_assemble_classifies_missing_usdt() {
        let pipeline = Pipeline::new(
            Arc::new(FailingMetrics),
            Arc::new(FailingFeed),
            &test_config(),
        );
        let report = pipeline.assemble(now(), Some(vec![2e11, 2e11, 2e11]), None, &[]);
        // BTC outflow plus quiet whales, USDT missing.
        assert_eq!(report.verdict.score, 2);
        assert_eq!(report.verdict.label, SentimentLabel::Bullish);
        assert!(report.sections[2].contains("data unavailable"));
    }
}
