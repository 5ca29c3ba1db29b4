//! Crypto Fund-Flow Sentiment Digest
//!
//! A single-shot batch job that combines three market signals (BTC exchange
//! net flow, USDT supply delta, and large-transfer social alerts) into one
//! scored sentiment report delivered to a Telegram channel.

pub mod sources;
pub mod parser;
pub mod filter;
pub mod interpreter;
pub mod scorer;
pub mod report;
pub mod pipeline;
pub mod notify;
pub mod config;
pub mod types;
pub mod error;
