//! Material transfer filtering
//!
//! Applies the size/destination policy that decides which parsed transfer
//! events count as "alarming" for the digest: an inflow-to-known-exchange
//! marker in the text, a material USD size, and a tracked asset.

use crate::types::TransferEvent;

/// Phrases marking an inflow to a known exchange.
pub const DESTINATION_MARKERS: [&str; 5] = [
    "transferred to",
    "to #coinbase",
    "to #binance",
    "to #kraken",
    "to #bitfinex",
];

/// Default material-size threshold in USD.
pub const DEFAULT_MIN_AMOUNT_USD: f64 = 50_000_000.0;

/// Size/destination policy over parsed transfer events.
#[derive(Debug, Clone)]
pub struct MaterialTransferFilter {
    min_amount_usd: f64,
}

impl Default for MaterialTransferFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialTransferFilter {
    pub fn new() -> Self {
        Self {
            min_amount_usd: DEFAULT_MIN_AMOUNT_USD,
        }
    }

    pub fn with_min_amount(mut self, min_amount_usd: f64) -> Self {
        self.min_amount_usd = min_amount_usd;
        self
    }

    /// Keep alarming events only, preserving input order.
    ///
    /// An empty result is a valid outcome ("no alarming events today"), not
    /// an error.
    pub fn filter(&self, events: Vec<TransferEvent>) -> Vec<TransferEvent> {
        events.into_iter().filter(|e| self.is_alarming(e)).collect()
    }

    /// Policy check for a single event.
    pub fn is_alarming(&self, event: &TransferEvent) -> bool {
        DESTINATION_MARKERS
            .iter()
            .any(|marker| event.raw_text.contains(marker))
            && event.amount_usd >= self.min_amount_usd
            && event.asset.is_tracked()
    }
}
