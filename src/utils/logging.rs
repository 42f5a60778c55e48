//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for flow-enabled bots.

use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
///
/// When a file path is configured, log output is duplicated to a daily
/// rolling file. The returned guard must be held for the lifetime of the
/// process so buffered log lines are flushed on shutdown.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout));

    let guard = match &config.file_path {
        Some(path) => {
            let file_appender = tracing_appender::rolling::daily(path, "stepflow.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    };

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a button press with structured data
pub fn log_button_press(user_id: &str, step: &str, action: &str) {
    info!(
        user_id = user_id,
        step = step,
        action = action,
        "Button pressed"
    );
}

/// Log a step transition
pub fn log_transition(user_id: &str, from: Option<&str>, to: &str) {
    info!(
        user_id = user_id,
        from = from,
        to = to,
        "Step transition"
    );
}

/// Log state persistence operations
pub fn log_state_update(user_id: &str, step: Option<&str>, confirmed: Option<bool>) {
    debug!(
        user_id = user_id,
        step = step,
        confirmed = confirmed,
        "User state updated"
    );
}
