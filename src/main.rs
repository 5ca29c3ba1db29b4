//! Crypto Fund-Flow Sentiment Digest
//!
//! Runs the full pipeline once and delivers the report to Telegram. Intended
//! to be invoked on an external schedule (cron); on an unhandled failure a
//! short fallback notice goes out through the same channel instead.

use chrono::Utc;
use flowdigest_bot::{
    config::Config,
    notify::Notifier,
    pipeline::Pipeline,
    sources::{coinmetrics::CoinMetricsSource, whale_feed::WhaleAlertFeed},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let notifier = Notifier::new(&config.telegram);

    let metrics = Arc::new(CoinMetricsSource::new(&config.metrics));
    let feed = Arc::new(WhaleAlertFeed::new(&config.feed));
    let pipeline = Pipeline::new(metrics, feed, &config);

    // One timestamp per invocation, threaded through the whole pipeline.
    let now = Utc::now();

    let delivery = match pipeline.run(now).await {
        Ok(report) => {
            tracing::info!("Digest assembled, delivering");
            notifier.send_report(&report).await
        }
        Err(e) => {
            tracing::error!("Digest generation failed: {}", e);
            notifier.send_failure("digest generation", &e.to_string()).await
        }
    };

    if let Err(e) = delivery {
        tracing::error!("Delivery failed: {}", e);
        return Err(e.into());
    }

    tracing::info!("Digest delivered");
    Ok(())
}
