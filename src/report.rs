//! Report rendering
//!
//! Assembles the digest sections in fixed order: header, BTC flow, USDT
//! supply, whale list, verdict. Every section renders even when its upstream
//! data was missing; a placeholder stands in, the section is never omitted.
//! Output is Telegram HTML.

use crate::types::{
    FlowClassification, FlowDirection, Report, SentimentLabel, SentimentVerdict, TransferEvent,
};
use chrono::{DateTime, Utc};

const DATA_UNAVAILABLE: &str = "⚠️ data unavailable";

/// Renders the final digest text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRenderer;

impl ReportRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        generated_at: DateTime<Utc>,
        btc_flow: &FlowClassification,
        usdt_supply: &FlowClassification,
        alarming: &[TransferEvent],
        verdict: SentimentVerdict,
    ) -> Report {
        let sections = vec![
            format!(
                "📊 <b>Crypto Fund Flow Daily</b>  {}",
                generated_at.format("%Y-%m-%d")
            ),
            flow_section("🔍", btc_flow, FlowNotes::ExchangeFlow),
            flow_section("💰", usdt_supply, FlowNotes::Supply),
            whale_section(alarming),
            verdict_section(verdict),
        ];

        Report {
            generated_at,
            sections,
            verdict,
        }
    }
}

/// Which interpretation notes a flow section carries. Exchange flow reads
/// outflow as bullish; supply reads inflow (minting) as bullish.
#[derive(Clone, Copy)]
enum FlowNotes {
    ExchangeFlow,
    Supply,
}

fn flow_section(emoji: &str, class: &FlowClassification, notes: FlowNotes) -> String {
    let title = format!("{} <b>{}</b>", emoji, class.metric_name);
    if class.direction == FlowDirection::Missing {
        return format!("{}\n{}", title, DATA_UNAVAILABLE);
    }

    let note = match (notes, class.direction) {
        (FlowNotes::ExchangeFlow, FlowDirection::Outflow) => "✅ sustained outflow (bullish)",
        (FlowNotes::ExchangeFlow, FlowDirection::Inflow) => "🔴 sustained inflow (bearish)",
        (FlowNotes::Supply, FlowDirection::Inflow) => "✅ large mint (bullish)",
        (FlowNotes::Supply, FlowDirection::Outflow) => "🔴 large burn (bearish)",
        _ => "⚠️ little change",
    };

    format!("{}\n<code>{}</code> {}", title, class.magnitude_label, note)
}

fn whale_section(alarming: &[TransferEvent]) -> String {
    let title = "🐋 <b>Large inflows to exchanges (>50M USD)</b>";
    if alarming.is_empty() {
        return format!("{}\nno unusual large inflows today", title);
    }
    let lines: Vec<&str> = alarming.iter().map(|e| e.raw_text.as_str()).collect();
    format!("{}\n{}", title, lines.join("\n"))
}

fn verdict_section(verdict: SentimentVerdict) -> String {
    match verdict.label {
        SentimentLabel::Bullish => {
            "📈 <b>Verdict: bullish alignment, cautiously long</b>".to_string()
        }
        SentimentLabel::Mixed => {
            "⚠️ <b>Verdict: mixed signals, better to wait</b>".to_string()
        }
        SentimentLabel::Bearish => {
            "📉 <b>Verdict: downside risk rising, caution</b>".to_string()
        }
    }
}
