//! Sentiment scoring
//!
//! Combines the two flow classifications and the alarming-event list into a
//! bounded score. Pure function of its inputs: no clock, no randomness, no
//! state between cycles.

use crate::types::{FlowClassification, FlowDirection, SentimentLabel, SentimentVerdict, TransferEvent};

/// Deterministic 0..=3 scorer.
///
/// One point each for: BTC flow classified `Outflow`, USDT supply classified
/// `Inflow`, and an empty alarming-event list. `Missing` classifications
/// contribute nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentScorer;

impl SentimentScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(
        &self,
        btc_flow: &FlowClassification,
        usdt_supply: &FlowClassification,
        alarming: &[TransferEvent],
    ) -> SentimentVerdict {
        let mut score = 0u8;
        if btc_flow.direction == FlowDirection::Outflow {
            score += 1;
        }
        if usdt_supply.direction == FlowDirection::Inflow {
            score += 1;
        }
        if alarming.is_empty() {
            score += 1;
        }

        let label = match score {
            2..=3 => SentimentLabel::Bullish,
            1 => SentimentLabel::Mixed,
            _ => SentimentLabel::Bearish,
        };

        SentimentVerdict { score, label }
    }
}
