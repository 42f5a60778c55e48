//! stepflow
//!
//! A declarative helper for building multi-step inline-keyboard flows on
//! top of a teloxide bot, persisting per-user step state to PostgreSQL.
//! Screens declare their buttons as data, a registry maps step names to
//! screen constructors, and the engine performs the recorded transitions
//! and keeps the state table current.

pub mod config;
pub mod database;
pub mod flow;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{FlowError, Result};

// Re-export main components for easy access
pub use database::DatabasePool;
pub use flow::{FlowEngine, ScreenRegistry, FlowScreen, FlowButton, ScreenContext};
pub use state::{UserState, StatePatch, UserStateRepository};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
