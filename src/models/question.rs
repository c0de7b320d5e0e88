// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// Question kind. Multiple-choice questions carry `options` and a
/// `correct_answer` index; short-answer questions carry `expected_answers`
/// graded numerically against a tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    ShortAnswer,
}

/// Topic the question belongs to. Used for pool filtering and the
/// per-category result breakdown.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum QuestionCategory {
    FlightPlanning,
    Navigation,
    Meteorology,
    Performance,
    FuelPolicy,
    General,
}

/// One expected numeric answer for a short-answer question.
/// Grading is `|actual - value| <= tolerance`, boundary inclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectedAnswer {
    pub field: String,
    pub value: f64,
    pub tolerance: f64,
    pub unit: Option<String>,
}

/// Represents the 'questions' table in the database.
/// Immutable once loaded; the generator never mutates pool entries.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    pub title: String,

    /// The scenario text / given data shown to the candidate.
    pub description: String,

    pub question_type: QuestionType,

    pub category: QuestionCategory,

    /// Mark value 1..=5. Drives scenario quota selection.
    pub marks: i64,

    /// Ordered option texts for multiple-choice questions.
    /// Stored as a JSON array in the database.
    pub options: Option<Json<Vec<String>>>,

    /// Index of the correct option. Historic bank exports stored this as
    /// either a JSON number or a numeric string; normalize before comparing.
    pub correct_answer: Option<Json<serde_json::Value>>,

    /// Expected numeric answers for short-answer questions.
    pub expected_answers: Option<Json<Vec<ExpectedAnswer>>>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Question {
    /// Normalizes the stored correct-answer index to an integer,
    /// tolerating both number and string encodings.
    pub fn correct_index(&self) -> Option<i64> {
        match self.correct_answer.as_deref() {
            Some(serde_json::Value::Number(n)) => n.as_i64(),
            Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Optional topic filters applied to the pool before quota grouping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionFilters {
    pub include_categories: Option<Vec<QuestionCategory>>,
    pub exclude_categories: Option<Vec<QuestionCategory>>,
}

impl QuestionFilters {
    pub fn matches(&self, category: QuestionCategory) -> bool {
        if let Some(include) = &self.include_categories {
            if !include.contains(&category) {
                return false;
            }
        }
        if let Some(exclude) = &self.exclude_categories {
            if exclude.contains(&category) {
                return false;
            }
        }
        true
    }
}

/// Bank-level statistics used by the authoring UI to judge pool coverage.
#[derive(Debug, Serialize)]
pub struct QuestionStats {
    pub total_questions: i64,
    /// Mark value (1..=5) -> number of questions in the bank.
    pub mark_distribution: std::collections::BTreeMap<i64, i64>,
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 4000))]
    pub description: String,
    pub question_type: QuestionType,
    pub category: QuestionCategory,
    #[validate(range(min = 1, max = 5))]
    pub marks: i64,
    #[validate(custom(function = validate_options))]
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<serde_json::Value>,
    pub expected_answers: Option<Vec<ExpectedAnswer>>,
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.len() < 2 {
        return Err(validator::ValidationError::new("need_at_least_two_options"));
    }
    for opt in options {
        if opt.is_empty() || opt.len() > 500 {
            return Err(validator::ValidationError::new("option_length_invalid"));
        }
    }
    Ok(())
}

impl CreateQuestionRequest {
    /// Cross-field checks the derive cannot express: each question type
    /// requires its own grading payload.
    pub fn check_payload(&self) -> Result<(), String> {
        match self.question_type {
            QuestionType::MultipleChoice => {
                let options = self
                    .options
                    .as_ref()
                    .ok_or("multiple-choice questions require options")?;
                let index = match &self.correct_answer {
                    Some(serde_json::Value::Number(n)) => n.as_i64(),
                    Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
                    _ => None,
                }
                .ok_or("multiple-choice questions require a correct_answer index")?;
                if index < 0 || index as usize >= options.len() {
                    return Err("correct_answer index is out of range".to_string());
                }
            }
            QuestionType::ShortAnswer => {
                let expected = self
                    .expected_answers
                    .as_ref()
                    .ok_or("short-answer questions require expected_answers")?;
                if expected.is_empty() {
                    return Err("expected_answers must not be empty".to_string());
                }
                if expected.iter().any(|e| e.tolerance < 0.0) {
                    return Err("tolerance must not be negative".to_string());
                }
            }
        }
        Ok(())
    }
}
