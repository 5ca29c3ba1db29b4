//! External data collaborators
//!
//! The pipeline talks to its two data sources through async traits so tests
//! can substitute in-memory fakes:
//! - [`MetricSource`]: daily numeric time series (Coin Metrics open API)
//! - [`AlertFeed`]: raw large-transfer alert lines (whale-alert RSS mirror)

pub mod coinmetrics;
pub mod whale_feed;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One raw alert line with its publish time.
#[derive(Debug, Clone)]
pub struct AlertLine {
    pub text: String,
    pub published_at: DateTime<Utc>,
}

/// Daily time-series provider.
#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Fetch `days` of daily samples for `metric`/`asset`, oldest to newest,
    /// ending at `end`. `Ok(None)` is an explicit no-data result, distinct
    /// from a transport error.
    async fn series(
        &self,
        metric: &str,
        asset: &str,
        days: i64,
        end: DateTime<Utc>,
    ) -> Result<Option<Vec<f64>>>;
}

/// Large-transfer alert provider.
#[async_trait]
pub trait AlertFeed: Send + Sync {
    /// Fetch alert lines published within `window_hours` before `now`,
    /// oldest lines already excluded by the collaborator.
    async fn recent_alerts(&self, now: DateTime<Utc>, window_hours: i64) -> Result<Vec<AlertLine>>;
}
