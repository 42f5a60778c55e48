//! State management module
//!
//! This module defines the persisted per-user state record and its
//! repository

pub mod model;
pub mod repository;

// Re-export commonly used state components
pub use model::{UserState, StatePatch};
pub use repository::UserStateRepository;
