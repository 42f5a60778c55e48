//! User state repository implementation
//!
//! Each call acquires a connection from the pool for just that statement
//! sequence; there is no cross-request locking, so concurrent updates to
//! the same user resolve last-write-wins.

use sqlx::PgPool;

use crate::state::model::{StatePatch, UserState};
use crate::utils::errors::FlowError;
use crate::utils::logging;

#[derive(Debug, Clone)]
pub struct UserStateRepository {
    pool: PgPool,
}

impl UserStateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find a user's state record
    pub async fn find(&self, user_id: &str) -> Result<Option<UserState>, FlowError> {
        let state = sqlx::query_as::<_, UserState>(
            "SELECT user_id, step, confirmed FROM user_states WHERE user_id = $1"
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(state)
    }

    /// Apply a patch to a user's state, creating the record if it does
    /// not exist yet
    pub async fn upsert(&self, user_id: &str, patch: StatePatch) -> Result<UserState, FlowError> {
        let mut state = self
            .find(user_id)
            .await?
            .unwrap_or_else(|| UserState::new(user_id));
        patch.apply_to(&mut state);

        let state = sqlx::query_as::<_, UserState>(
            r#"
            INSERT INTO user_states (user_id, step, confirmed)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET step = EXCLUDED.step,
                confirmed = EXCLUDED.confirmed
            RETURNING user_id, step, confirmed
            "#
        )
        .bind(&state.user_id)
        .bind(&state.step)
        .bind(state.confirmed)
        .fetch_one(&self.pool)
        .await?;

        logging::log_state_update(&state.user_id, state.step.as_deref(), state.confirmed);
        Ok(state)
    }

    /// List all records with a non-NULL step, for startup restore
    pub async fn list_in_flight(&self) -> Result<Vec<UserState>, FlowError> {
        let states = sqlx::query_as::<_, UserState>(
            "SELECT user_id, step, confirmed FROM user_states WHERE step IS NOT NULL"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(states)
    }

    /// Clear both state fields for a user; the record itself is kept
    pub async fn clear(&self, user_id: &str) -> Result<(), FlowError> {
        sqlx::query(
            "UPDATE user_states SET step = NULL, confirmed = NULL WHERE user_id = $1"
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Count total state records
    pub async fn count(&self) -> Result<i64, FlowError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_states")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_from_lazy_pool() {
        // connect_lazy builds a pool without touching the server
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/stepflow_test")
            .unwrap();
        let repo = UserStateRepository::new(pool);
        assert!(!repo.pool().is_closed());
    }
}
