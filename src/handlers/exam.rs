// src/handlers/exam.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::{
    error::AppError,
    exam::{generator::generate_trial_exam, scenarios::ScenarioTable},
    models::exam::GenerateExamRequest,
    state::AppState,
    store,
};

/// Lists the built-in exam scenarios.
pub async fn list_scenarios(
    State(scenarios): State<Arc<ScenarioTable>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(scenarios.all().to_vec()))
}

/// Generates (and stores) a trial exam for a scenario.
///
/// * Unknown scenario -> 404.
/// * Quota shortages -> 400 with the full per-mark-value shortage list.
/// * An omitted seed is drawn from the clock and echoed back in the exam,
///   so every generated paper stays reproducible and shareable.
pub async fn generate_exam(
    State(state): State<AppState>,
    Json(req): Json<GenerateExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    let scenario = state
        .scenarios
        .get(&req.scenario_id)
        .ok_or_else(|| AppError::NotFound(format!("Unknown scenario '{}'", req.scenario_id)))?;

    let pool = store::questions::all_questions(&state.pool).await?;
    let seed = req.seed.unwrap_or_else(clock_seed);

    let exam = generate_trial_exam(&pool, scenario, seed, req.filters.as_ref())?;
    store::exams::save_exam(&state.pool, &exam).await?;

    tracing::info!(
        "Generated exam {} (scenario {}, seed {})",
        exam.id,
        exam.scenario,
        exam.seed
    );

    Ok((StatusCode::CREATED, Json(exam)))
}

/// Returns a stored exam verbatim. This is also the JSON export surface:
/// the payload is exactly what the generator produced.
pub async fn get_exam(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let exam = store::exams::load_exam(&pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Exam not found".to_string()))?;

    Ok(Json(exam))
}

fn clock_seed() -> u32 {
    let now = chrono::Utc::now();
    (now.timestamp() as u32) ^ now.timestamp_subsec_nanos()
}
