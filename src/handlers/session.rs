// src/handlers/session.rs
//
// HTTP lifecycle of an exam attempt. Handlers load the session from its
// slot, apply the pure functions in `exam::session`, and re-persist the
// returned value; the session itself is a single-writer value and no state
// lives in memory between requests.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    config::DEFAULT_SESSION_SLOT,
    error::AppError,
    exam::session::{
        calculate_results, complete_session, create_session, is_session_expired, remaining_time,
        submit_answer, update_current_question, update_time_spent, validate_answer,
    },
    models::{
        exam::TrialExam,
        session::{AnswerPayload, ExamResults, ExamSession, UserAnswer},
    },
    store::{
        self,
        sessions::{SessionStore, SqliteSessionStore},
    },
};

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub exam_id: String,
    pub user_id: Option<String>,
    /// Storage slot for the attempt. Defaults to the application-wide
    /// single active slot.
    pub slot: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub index: usize,
}

#[derive(Debug, Serialize)]
pub struct TickResponse {
    pub session: ExamSession,
    pub remaining_seconds: i64,
    /// True when this tick detected expiry and auto-completed the session.
    pub expired: bool,
}

#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub session: ExamSession,
    pub results: ExamResults,
}

/// Starts a new attempt at an exam and persists it to its slot,
/// overwriting whatever session occupied the slot before.
pub async fn start_session(
    State(pool): State<SqlitePool>,
    Json(req): Json<StartSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let exam = load_exam(&pool, &req.exam_id).await?;
    let session = create_session(&exam, req.user_id, chrono::Utc::now());

    let slot = req.slot.unwrap_or_else(|| DEFAULT_SESSION_SLOT.to_string());
    SqliteSessionStore::new(pool).save(&slot, &session).await?;

    tracing::info!("Started session {} for exam {}", session.id, exam.id);

    Ok((StatusCode::CREATED, Json(session)))
}

/// Returns the session in a slot, or JSON null when the slot is empty (or
/// holds unreadable state) — "no session" is a normal answer, not an
/// error.
pub async fn get_session(
    State(pool): State<SqlitePool>,
    Path(slot): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = SqliteSessionStore::new(pool).load(&slot).await?;
    Ok(Json(session))
}

/// Moves the current-question bookmark. This handler is the range guard
/// the session manager documents: `update_current_question` itself trusts
/// its input, so the check against the exam must happen here.
pub async fn navigate(
    State(pool): State<SqlitePool>,
    Path(slot): Path<String>,
    Json(req): Json<NavigateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let store = SqliteSessionStore::new(pool.clone());
    let session = require_session(&store, &slot).await?;
    let exam = load_exam(&pool, &session.exam_id).await?;

    if req.index >= exam.total_questions {
        return Err(AppError::BadRequest(format!(
            "Question index {} is out of range (exam has {} questions)",
            req.index, exam.total_questions
        )));
    }

    let session = update_current_question(session, req.index);
    store.save(&slot, &session).await?;

    Ok(Json(session))
}

/// Grades and records an answer. Recording never fails on a wrong answer —
/// correctness is just a field — but a sealed session refuses changes.
pub async fn answer(
    State(pool): State<SqlitePool>,
    Path(slot): Path<String>,
    Json(payload): Json<AnswerPayload>,
) -> Result<impl IntoResponse, AppError> {
    let store = SqliteSessionStore::new(pool.clone());
    let session = require_session(&store, &slot).await?;

    if session.is_completed {
        return Err(AppError::Conflict(
            "Session is already completed; answers are read-only".to_string(),
        ));
    }

    let exam = load_exam(&pool, &session.exam_id).await?;
    let question = exam
        .questions
        .iter()
        .find(|q| q.question.id == payload.question_id)
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Question {} is not part of exam {}",
                payload.question_id, exam.id
            ))
        })?;

    let now = chrono::Utc::now();
    let session = update_time_spent(session, now);
    let user_answer = UserAnswer {
        question_id: payload.question_id,
        question_type: question.question.question_type,
        multiple_choice_answer: payload.multiple_choice_answer,
        short_answers: payload.short_answers.clone(),
        is_correct: validate_answer(question, &payload),
        time_spent: session.time_spent,
        timestamp: now,
    };

    let session = submit_answer(session, user_answer);
    store.save(&slot, &session).await?;

    Ok(Json(session))
}

/// The cooperative one-second poll: refreshes elapsed time, reports the
/// remaining seconds and auto-completes silently once the limit passes.
pub async fn tick(
    State(pool): State<SqlitePool>,
    Path(slot): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let store = SqliteSessionStore::new(pool.clone());
    let session = require_session(&store, &slot).await?;
    let exam = load_exam(&pool, &session.exam_id).await?;

    let now = chrono::Utc::now();
    let mut session = update_time_spent(session, now);

    let expired = !session.is_completed && is_session_expired(&session, &exam, now);
    if expired {
        let results = calculate_results(&exam, &session);
        session = complete_session(session, Some(results.total_score), now);
        tracing::info!("Session {} expired and was auto-completed", session.id);
    }

    let remaining_seconds = remaining_time(&session, &exam, now);
    store.save(&slot, &session).await?;

    Ok(Json(TickResponse {
        session,
        remaining_seconds,
        expired,
    }))
}

/// Manual submission: scores the attempt and seals the session.
/// Idempotent — completing again re-scores and re-stamps the end time.
pub async fn complete(
    State(pool): State<SqlitePool>,
    Path(slot): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let store = SqliteSessionStore::new(pool.clone());
    let session = require_session(&store, &slot).await?;
    let exam = load_exam(&pool, &session.exam_id).await?;

    let now = chrono::Utc::now();
    let session = update_time_spent(session, now);
    let results = calculate_results(&exam, &session);
    let session = complete_session(session, Some(results.total_score), now);
    store.save(&slot, &session).await?;

    Ok(Json(CompleteResponse { session, results }))
}

/// Score breakdown for the attempt in a slot, computed on demand.
pub async fn results(
    State(pool): State<SqlitePool>,
    Path(slot): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let store = SqliteSessionStore::new(pool.clone());
    let session = require_session(&store, &slot).await?;
    let exam = load_exam(&pool, &session.exam_id).await?;

    Ok(Json(calculate_results(&exam, &session)))
}

/// Empties a slot.
pub async fn clear_session(
    State(pool): State<SqlitePool>,
    Path(slot): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    SqliteSessionStore::new(pool).clear(&slot).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn require_session(
    store: &SqliteSessionStore,
    slot: &str,
) -> Result<ExamSession, AppError> {
    store
        .load(slot)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No session in slot '{}'", slot)))
}

async fn load_exam(pool: &SqlitePool, exam_id: &str) -> Result<TrialExam, AppError> {
    store::exams::load_exam(pool, exam_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Exam '{}' not found", exam_id)))
}
