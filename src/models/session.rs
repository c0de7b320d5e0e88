// src/models/session.rs

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::question::{QuestionCategory, QuestionType};

/// A recorded answer for one question. Created on first submission and
/// overwritten on resubmission while the session is still in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAnswer {
    pub question_id: i64,
    pub question_type: QuestionType,
    /// Selected option index (in shuffled-option order) for multiple choice.
    pub multiple_choice_answer: Option<i64>,
    /// Field name -> entered number for short-answer questions.
    pub short_answers: Option<HashMap<String, f64>>,
    pub is_correct: bool,
    /// Session-elapsed seconds at the moment of submission.
    pub time_spent: i64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Mutable state of one exam attempt.
///
/// Single-writer value: every mutator in `exam::session` consumes the
/// session and returns the updated copy, which the handler re-persists.
/// Timestamps round-trip through the store as real datetimes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamSession {
    pub id: String,
    pub exam_id: String,
    pub user_id: Option<String>,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub current_question_index: usize,
    pub answers: HashMap<i64, UserAnswer>,
    /// Elapsed seconds, refreshed by the tick endpoint. Monotonic within a
    /// session.
    pub time_spent: i64,
    pub is_completed: bool,
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
    pub score: Option<i64>,
    pub max_score: i64,
}

/// Correct/total tally for one slice of the exam (a mark value or a topic).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SliceBreakdown {
    pub total: usize,
    pub correct: usize,
    pub marks_available: i64,
    pub marks_scored: i64,
}

/// Aggregated scoring for a session, computed from the exam + answer map.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExamResults {
    pub total_score: i64,
    pub max_score: i64,
    pub percentage: f64,
    pub answered: usize,
    pub by_mark_value: BTreeMap<i64, SliceBreakdown>,
    pub by_category: BTreeMap<QuestionCategory, SliceBreakdown>,
}

/// Payload of a submitted answer, before grading.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerPayload {
    pub question_id: i64,
    pub multiple_choice_answer: Option<i64>,
    pub short_answers: Option<HashMap<String, f64>>,
}
