//! Flow module
//!
//! Screen trait, registry and the engine driving flows for a bot

pub mod engine;
pub mod registry;
pub mod screen;

// Re-export commonly used flow components
pub use engine::FlowEngine;
pub use registry::ScreenRegistry;
pub use screen::{FlowScreen, FlowButton, ScreenContext, CALLBACK_PREFIX};
