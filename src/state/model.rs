//! Per-user flow state model
//!
//! This module defines the persisted state record and the field-by-field
//! patch applied to it on every transition.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Persisted flow state for a single user
///
/// At most one record exists per user id. The record is created lazily on
/// the first update and is never deleted by the library; `step` is NULL
/// once a flow completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserState {
    pub user_id: String,
    pub step: Option<String>,
    pub confirmed: Option<bool>,
}

impl UserState {
    /// Create an empty state record for a user
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            step: None,
            confirmed: None,
        }
    }

    /// Check if the user is at a specific step
    pub fn is_at_step(&self, step: &str) -> bool {
        self.step.as_deref() == Some(step)
    }

    /// Check if the user is currently inside a flow
    pub fn in_flight(&self) -> bool {
        self.step.is_some()
    }
}

/// Field-by-field update to a user's state
///
/// Each field is either left untouched, set to a value, or explicitly
/// cleared to NULL. Untouched fields keep their stored value when the
/// patch is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatePatch {
    step: Option<Option<String>>,
    confirmed: Option<Option<bool>>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current step
    pub fn step(mut self, step: impl Into<String>) -> Self {
        self.step = Some(Some(step.into()));
        self
    }

    /// Clear the current step (sets the column to NULL)
    pub fn clear_step(mut self) -> Self {
        self.step = Some(None);
        self
    }

    /// Set the confirmation flag
    pub fn confirmed(mut self, confirmed: bool) -> Self {
        self.confirmed = Some(Some(confirmed));
        self
    }

    /// Clear the confirmation flag (sets the column to NULL)
    pub fn clear_confirmed(mut self) -> Self {
        self.confirmed = Some(None);
        self
    }

    /// Check if the patch touches no fields
    pub fn is_empty(&self) -> bool {
        self.step.is_none() && self.confirmed.is_none()
    }

    /// Apply the patch to a state record
    pub fn apply_to(&self, state: &mut UserState) {
        if let Some(step) = &self.step {
            state.step = step.clone();
        }
        if let Some(confirmed) = &self.confirmed {
            state.confirmed = *confirmed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = UserState::new("123");
        assert_eq!(state.user_id, "123");
        assert!(state.step.is_none());
        assert!(state.confirmed.is_none());
        assert!(!state.in_flight());
    }

    #[test]
    fn test_step_checks() {
        let mut state = UserState::new("123");
        state.step = Some("confirmation".to_string());

        assert!(state.in_flight());
        assert!(state.is_at_step("confirmation"));
        assert!(!state.is_at_step("start"));
    }

    #[test]
    fn test_patch_sets_fields() {
        let mut state = UserState::new("123");
        StatePatch::new()
            .step("start")
            .confirmed(false)
            .apply_to(&mut state);

        assert_eq!(state.step, Some("start".to_string()));
        assert_eq!(state.confirmed, Some(false));
    }

    #[test]
    fn test_patch_leaves_untouched_fields() {
        let mut state = UserState::new("123");
        state.step = Some("confirmation".to_string());
        state.confirmed = Some(true);

        StatePatch::new().step("start").apply_to(&mut state);

        assert_eq!(state.step, Some("start".to_string()));
        // confirmed was not part of the patch
        assert_eq!(state.confirmed, Some(true));
    }

    #[test]
    fn test_patch_clears_to_null() {
        let mut state = UserState::new("123");
        state.step = Some("confirmation".to_string());
        state.confirmed = Some(true);

        StatePatch::new()
            .clear_step()
            .clear_confirmed()
            .apply_to(&mut state);

        assert!(state.step.is_none());
        assert!(state.confirmed.is_none());
    }

    #[test]
    fn test_empty_patch() {
        assert!(StatePatch::new().is_empty());
        assert!(!StatePatch::new().step("start").is_empty());
        assert!(!StatePatch::new().clear_confirmed().is_empty());
    }
}
