// src/store/exams.rs

use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::exam::TrialExam;

/// Persists a generated exam verbatim as JSON. The stored payload is also
/// what the download/export surface serves, byte for byte.
pub async fn save_exam(pool: &SqlitePool, exam: &TrialExam) -> Result<(), AppError> {
    let payload = serde_json::to_string(exam)?;
    sqlx::query(
        r#"
        INSERT INTO trial_exams (id, payload, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET payload = excluded.payload
        "#,
    )
    .bind(&exam.id)
    .bind(payload)
    .bind(exam.created_at)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to save exam {}: {:?}", exam.id, e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(())
}

pub async fn load_exam(pool: &SqlitePool, id: &str) -> Result<Option<TrialExam>, AppError> {
    let payload: Option<String> =
        sqlx::query_scalar("SELECT payload FROM trial_exams WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    match payload {
        Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
        None => Ok(None),
    }
}
