//! Transfer event parsing
//!
//! Turns one raw alert line into a typed [`TransferEvent`]. The extraction
//! contract is deliberately small and explicit:
//!
//! - The USD amount is the numeric value immediately preceding the first
//!   literal `"USD"` marker, read from the last `(`-delimited group within
//!   that prefix (or the whole prefix when no parenthesis is present).
//!   Thousands separators are stripped before parsing.
//! - The asset is the first tracked ticker by byte position anywhere in the
//!   text; ties are impossible, absence yields [`Asset::Unknown`].
//!
//! A line without an extractable amount fails to parse and is dropped by the
//! caller (ParseSkip), never surfaced as an error.

use crate::filter::DESTINATION_MARKERS;
use crate::types::{Asset, TransferEvent};
use chrono::{DateTime, Utc};

/// Tracked tickers in precedence order (used only to break position ties).
const TRACKED_TICKERS: [(&str, Asset); 3] = [
    ("BTC", Asset::Btc),
    ("ETH", Asset::Eth),
    ("USDT", Asset::Usdt),
];

/// Parse one alert line into a transfer event.
///
/// Returns `None` when no USD amount is extractable; the caller logs and
/// skips the line.
pub fn parse_line(line: &str, timestamp: DateTime<Utc>) -> Option<TransferEvent> {
    let amount_usd = extract_usd_amount(line)?;
    Some(TransferEvent {
        raw_text: line.to_string(),
        amount_usd,
        asset: detect_asset(line),
        destination: extract_destination(line),
        timestamp,
    })
}

/// Numeric value preceding the first `"USD"`, from the last parenthesized
/// group if present.
fn extract_usd_amount(line: &str) -> Option<f64> {
    let prefix = &line[..line.find("USD")?];
    let group = match prefix.rfind('(') {
        Some(open) => &prefix[open + 1..],
        None => prefix,
    };
    group.trim().replace(',', "").parse().ok()
}

/// First tracked ticker by byte position, `Unknown` when none occurs.
fn detect_asset(line: &str) -> Asset {
    TRACKED_TICKERS
        .iter()
        .filter_map(|(ticker, asset)| line.find(ticker).map(|pos| (pos, *asset)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, asset)| asset)
        .unwrap_or(Asset::Unknown)
}

/// Destination text following the first matching inflow marker.
///
/// Exchange-handle markers (`"to #binance"` etc.) name the destination
/// themselves; the generic `"transferred to"` marker takes the remainder of
/// the line.
fn extract_destination(line: &str) -> String {
    for marker in DESTINATION_MARKERS {
        if let Some(pos) = line.find(marker) {
            if let Some(handle) = marker.strip_prefix("to ") {
                return handle.to_string();
            }
            return line[pos + marker.len()..].trim().to_string();
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        "2026-08-30T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_parse_whale_alert_line() {
        let line = "1,500 #BTC (75,000,000 USD) transferred from unknown wallet to #binance";
        let event = parse_line(line, ts()).unwrap();
        assert_eq!(event.amount_usd, 75_000_000.0);
        assert_eq!(event.asset, Asset::Btc);
        assert_eq!(event.destination, "#binance");
        assert_eq!(event.raw_text, line);
    }

    #[test]
    fn test_amount_from_last_paren_group() {
        // Earlier parenthesized groups must not win.
        let line = "whale (again) moved 10,000 #ETH (30,000,000 USD) transferred to Kraken";
        let event = parse_line(line, ts()).unwrap();
        assert_eq!(event.amount_usd, 30_000_000.0);
        assert_eq!(event.asset, Asset::Eth);
    }

    #[test]
    fn test_amount_without_parens() {
        let line = "60000000 USD in USDT transferred to #bitfinex";
        let event = parse_line(line, ts()).unwrap();
        assert_eq!(event.amount_usd, 60_000_000.0);
        assert_eq!(event.asset, Asset::Usdt);
    }

    #[test]
    fn test_no_usd_marker_skips() {
        assert!(parse_line("1,500 #BTC moved somewhere", ts()).is_none());
    }

    #[test]
    fn test_non_numeric_amount_skips() {
        assert!(parse_line("lots of USD transferred to #binance", ts()).is_none());
    }

    #[test]
    fn test_empty_line_skips() {
        assert!(parse_line("", ts()).is_none());
    }

    #[test]
    fn test_first_ticker_wins() {
        let line = "swap ETH for BTC (55,000,000 USD) transferred to #coinbase";
        let event = parse_line(line, ts()).unwrap();
        assert_eq!(event.asset, Asset::Eth);
    }

    #[test]
    fn test_unknown_asset() {
        let line = "9,000 #SOL (51,000,000 USD) transferred to #binance";
        let event = parse_line(line, ts()).unwrap();
        assert_eq!(event.asset, Asset::Unknown);
    }

    #[test]
    fn test_transferred_to_destination() {
        let line = "500 #BTC (52,000,000 USD) transferred to Gemini hot wallet";
        let event = parse_line(line, ts()).unwrap();
        assert_eq!(event.destination, "Gemini hot wallet");
    }

    #[test]
    fn test_decimal_amount() {
        let line = "#ETH (50,000,000.50 USD) transferred to #kraken";
        let event = parse_line(line, ts()).unwrap();
        assert_eq!(event.amount_usd, 50_000_000.50);
    }
}
