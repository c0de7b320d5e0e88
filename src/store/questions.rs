// src/store/questions.rs

use sqlx::SqlitePool;
use std::collections::BTreeMap;

use crate::error::AppError;
use crate::models::question::{CreateQuestionRequest, Question, QuestionStats};

/// Loads the whole question bank in stable id order. The generator's
/// determinism contract is over (pool order, scenario, seed), so the
/// ordering here must never change.
pub async fn all_questions(pool: &SqlitePool) -> Result<Vec<Question>, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, title, description, question_type, category, marks,
               options, correct_answer, expected_answers, created_at
        FROM questions
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch question bank: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(questions)
}

/// Bank totals per mark value, for the authoring/coverage view.
pub async fn question_stats(pool: &SqlitePool) -> Result<QuestionStats, AppError> {
    let rows: Vec<(i64, i64)> =
        sqlx::query_as("SELECT marks, COUNT(*) FROM questions GROUP BY marks ORDER BY marks")
            .fetch_all(pool)
            .await?;

    let mark_distribution: BTreeMap<i64, i64> = rows.into_iter().collect();
    let total_questions = mark_distribution.values().sum();

    Ok(QuestionStats {
        total_questions,
        mark_distribution,
    })
}

/// Inserts a new bank question and returns its id.
pub async fn insert_question(
    pool: &SqlitePool,
    req: &CreateQuestionRequest,
) -> Result<i64, AppError> {
    let options = req
        .options
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let correct_answer = req
        .correct_answer
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let expected_answers = req
        .expected_answers
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO questions
            (title, description, question_type, category, marks,
             options, correct_answer, expected_answers)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&req.title)
    .bind(&req.description)
    .bind(req.question_type)
    .bind(req.category)
    .bind(req.marks)
    .bind(options)
    .bind(correct_answer)
    .bind(expected_answers)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(id)
}
