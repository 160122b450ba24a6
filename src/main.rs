use std::sync::Arc;

use deadrank::aggregator;
use deadrank::apis::ApiManager;
use deadrank::arguments::{get_config_path, is_help_requested, is_once_enabled, print_help};
use deadrank::config;
use deadrank::logger::{self, LogTag};

/// Entry point for the deadrank service
///
/// Startup order: logger, config, shutdown handler, initial aggregation
/// pass, then the periodic refresh service. `--once` runs a single pass
/// and exits.
#[tokio::main]
async fn main() {
    logger::init();

    if is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    logger::info(LogTag::System, "deadrank starting up");

    let load_result = match get_config_path() {
        Some(path) => config::load_config_from_path(&path),
        None => config::load_config(),
    };
    if let Err(e) = load_result {
        logger::error(LogTag::Config, &format!("Failed to load config: {}", e));
        std::process::exit(1);
    }

    let manager = match config::with_config(|cfg| ApiManager::new(&cfg.apis)) {
        Ok(manager) => Arc::new(manager),
        Err(e) => {
            logger::error(LogTag::Api, &format!("Failed to build API clients: {}", e));
            std::process::exit(1);
        }
    };

    // Ctrl+C tears the store down, which stops the refresh service
    if let Err(e) = ctrlc::set_handler(|| {
        logger::info(LogTag::System, "Shutdown requested");
        aggregator::teardown_store();
    }) {
        logger::error(LogTag::System, &format!("Failed to install shutdown handler: {}", e));
        std::process::exit(1);
    }

    match aggregator::refresh(&manager).await {
        Ok(count) => {
            logger::info(
                LogTag::System,
                &format!("Initial pass complete: tokens={}", count),
            );
            aggregator::log_ranked_summary().await;
        }
        Err(e) => {
            logger::error(LogTag::System, &format!("Initial pass failed: {}", e));
            if is_once_enabled() {
                std::process::exit(1);
            }
        }
    }

    if is_once_enabled() {
        return;
    }

    aggregator::run_refresh_service(manager).await;
    logger::info(LogTag::System, "deadrank stopped");
}
