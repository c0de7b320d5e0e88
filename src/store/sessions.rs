// src/store/sessions.rs

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::session::ExamSession;

/// Key-value session persistence. One slot holds at most one session; the
/// application keeps a single active attempt by always using the same slot
/// key (see `config::DEFAULT_SESSION_SLOT`), which is a policy of the call
/// sites, not of this store.
#[async_trait]
pub trait SessionStore {
    async fn save(&self, slot: &str, session: &ExamSession) -> Result<(), AppError>;
    /// Absent or unreadable state is "no session", never an error: the
    /// trainer falls back to a fresh start rather than refusing to load.
    async fn load(&self, slot: &str) -> Result<Option<ExamSession>, AppError>;
    async fn clear(&self, slot: &str) -> Result<(), AppError>;
}

pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn save(&self, slot: &str, session: &ExamSession) -> Result<(), AppError> {
        let payload = serde_json::to_string(session)?;
        sqlx::query(
            r#"
            INSERT INTO exam_sessions (slot_key, payload, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(slot_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(slot)
        .bind(payload)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save session to slot '{}': {:?}", slot, e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(())
    }

    async fn load(&self, slot: &str) -> Result<Option<ExamSession>, AppError> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM exam_sessions WHERE slot_key = ?")
                .bind(slot)
                .fetch_optional(&self.pool)
                .await?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        match serde_json::from_str(&payload) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!("Discarding corrupt session in slot '{}': {}", slot, e);
                Ok(None)
            }
        }
    }

    async fn clear(&self, slot: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM exam_sessions WHERE slot_key = ?")
            .bind(slot)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
