// src/handlers/questions.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{error::AppError, models::question::CreateQuestionRequest, store};

/// Bank coverage statistics: total questions and the per-mark-value
/// distribution, used to judge whether a scenario is generable.
pub async fn stats(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let stats = store::questions::question_stats(&pool).await?;
    Ok(Json(stats))
}

/// Creates a new bank question.
pub async fn create_question(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }
    payload.check_payload().map_err(AppError::BadRequest)?;

    let id = store::questions::insert_question(&pool, &payload).await?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}
