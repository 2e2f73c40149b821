//! Candle - local media catalog
//!
//! Main entry point.

mod app;

use anyhow::Result;

fn main() -> Result<()> {
    // Initialize logging and panic hook first
    app_log::init()?;

    // Clean up old logs (7 days)
    if let Err(e) = app_log::cleanup_old_logs(7) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("Candle starting...");

    let config = app_core::CatalogConfig::load().unwrap_or_else(|e| {
        tracing::warn!("{}; using defaults", e.user_message());
        app_core::CatalogConfig::default()
    });
    let args: Vec<String> = std::env::args().skip(1).collect();

    app::run(config, &args)
}
