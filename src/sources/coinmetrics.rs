//! Coin Metrics time-series client
//!
//! Fetches daily asset metrics from the open (keyless) community API.
//! Values arrive as JSON strings and are parsed to `f64`; points that fail
//! to parse are skipped.

use super::MetricSource;
use crate::config::MetricsConfig;
use crate::error::{DigestError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;

pub struct CoinMetricsSource {
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    data: Option<Vec<SeriesPoint>>,
}

#[derive(Debug, Deserialize)]
struct SeriesPoint {
    #[serde(default)]
    values: Vec<String>,
}

impl CoinMetricsSource {
    pub fn new(config: &MetricsConfig) -> Self {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MetricSource for CoinMetricsSource {
    async fn series(
        &self,
        metric: &str,
        asset: &str,
        days: i64,
        end: DateTime<Utc>,
    ) -> Result<Option<Vec<f64>>> {
        let start = end - Duration::days(days);
        let url = format!(
            "{}/timeseries/asset-metrics?assets={}&metrics={}&start={}&end={}&frequency=1d",
            self.base_url,
            asset,
            metric,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
        );

        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(DigestError::Api(format!(
                "metric fetch for {}/{} returned {}",
                asset,
                metric,
                resp.status()
            )));
        }

        let body: SeriesResponse = resp.json().await?;
        let Some(points) = body.data else {
            return Ok(None);
        };
        if points.is_empty() {
            return Ok(None);
        }

        let samples: Vec<f64> = points
            .iter()
            .filter_map(|p| p.values.first())
            .filter_map(|v| v.parse().ok())
            .collect();

        if samples.is_empty() {
            Ok(None)
        } else {
            Ok(Some(samples))
        }
    }
}
