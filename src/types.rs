//! Core data types shared across the pipeline
//!
//! All of these are plain immutable values: created once per digest run,
//! consumed by the next stage, discarded after rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Asset ticker tracked by the digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    Btc,
    Eth,
    Usdt,
    /// No tracked ticker found in the alert text.
    Unknown,
}

impl Asset {
    /// Whether the asset belongs to the tracked set (excludes `Unknown`).
    pub fn is_tracked(&self) -> bool {
        matches!(self, Asset::Btc | Asset::Eth | Asset::Usdt)
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Asset::Btc => "BTC",
            Asset::Eth => "ETH",
            Asset::Usdt => "USDT",
            Asset::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// A typed large-transfer event parsed from one raw alert line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferEvent {
    /// Original alert text, kept verbatim for the report.
    pub raw_text: String,
    /// Transfer size in USD.
    pub amount_usd: f64,
    /// First tracked ticker found in the text.
    pub asset: Asset,
    /// Destination extracted from the inflow marker (informational).
    pub destination: String,
    /// Publish time of the alert.
    pub timestamp: DateTime<Utc>,
}

/// Classified trend direction of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowDirection {
    /// Net movement into exchanges (bearish for flow, bullish for supply).
    Inflow,
    /// Net movement out of exchanges.
    Outflow,
    /// Within the stable band, boundaries included.
    Stable,
    /// No usable data for this metric this cycle.
    Missing,
}

/// One metric's classified trend for a single digest cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowClassification {
    /// Human-readable metric name used as the section title.
    pub metric_name: String,
    /// Net value in reporting units (0.0 when direction is `Missing`).
    pub net_value: f64,
    pub direction: FlowDirection,
    /// Pre-formatted magnitude, e.g. `"+12.3 BTC"` (empty when `Missing`).
    pub magnitude_label: String,
}

/// Final categorical sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Bullish,
    Mixed,
    Bearish,
}

/// Bounded sentiment score plus its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentVerdict {
    /// Count of bullish conditions met, 0..=3.
    pub score: u8,
    pub label: SentimentLabel,
}

/// Fully assembled digest, one per invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    /// Sections in fixed order: header, BTC flow, USDT supply, whale list, verdict.
    pub sections: Vec<String>,
    pub verdict: SentimentVerdict,
}

impl Report {
    /// Render the final message body (Telegram HTML).
    pub fn to_text(&self) -> String {
        self.sections.join("\n\n")
    }
}
