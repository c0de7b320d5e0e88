// src/models/exam.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::question::{Question, QuestionFilters};

/// A named exam template: how many questions of each mark value to draw.
///
/// Invariants (enforced by `ScenarioTable::builtin` at startup):
/// * the distribution counts sum to exactly 17 questions;
/// * `sum(mark * count)` equals `total_marks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamScenarioConfig {
    pub id: String,
    pub label: String,
    pub total_marks: i64,
    /// Mark value (1..=5) -> required question count.
    pub distribution: BTreeMap<i64, usize>,
    pub description: String,
}

/// One question instance inside a generated exam.
///
/// For multiple-choice questions the options are shuffled per exam and the
/// correct index is remapped to the shuffled ordering, so grading never
/// consults the bank ordering again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamQuestion {
    pub question: Question,
    /// Per-instance mark value (copied from the bank item at assembly time).
    pub marks: i64,
    pub shuffled_options: Option<Vec<String>>,
    /// Correct option index in terms of `shuffled_options`.
    pub correct_option_index: Option<i64>,
}

impl ExamQuestion {
    /// Index of the correct option for grading: the shuffle-remapped index
    /// when options were shuffled, else the bank item's own (normalized)
    /// index.
    pub fn correct_index(&self) -> Option<i64> {
        self.correct_option_index.or_else(|| self.question.correct_index())
    }
}

/// An immutable generated exam. Regenerating with the same
/// (pool order, scenario, seed) reproduces the identical question ordering
/// and option shuffles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialExam {
    pub id: String,
    pub scenario: String,
    pub seed: u32,
    pub total_questions: usize,
    pub total_marks: i64,
    pub distribution: BTreeMap<i64, usize>,
    pub questions: Vec<ExamQuestion>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Minutes allowed for the attempt.
    pub time_limit: i64,
}

/// DTO for requesting exam generation.
#[derive(Debug, Deserialize)]
pub struct GenerateExamRequest {
    pub scenario_id: String,
    /// Omitted seed is drawn from the clock; echoed back in the exam so the
    /// attempt stays reproducible/shareable.
    pub seed: Option<u32>,
    pub filters: Option<QuestionFilters>,
}
