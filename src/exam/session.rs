// src/exam/session.rs
//
// Session lifecycle as plain functions: every mutator consumes the session
// and returns the updated value for the caller to re-persist. Nothing here
// reads the wall clock or touches storage, which keeps the whole lifecycle
// unit-testable.

use chrono::{DateTime, Utc};

use crate::models::exam::{ExamQuestion, TrialExam};
use crate::models::question::QuestionType;
use crate::models::session::{AnswerPayload, ExamResults, ExamSession, SliceBreakdown, UserAnswer};

/// Starts a fresh attempt at `exam`.
pub fn create_session(exam: &TrialExam, user_id: Option<String>, now: DateTime<Utc>) -> ExamSession {
    ExamSession {
        id: uuid::Uuid::new_v4().to_string(),
        exam_id: exam.id.clone(),
        user_id,
        start_time: now,
        current_question_index: 0,
        answers: std::collections::HashMap::new(),
        time_spent: 0,
        is_completed: false,
        end_time: None,
        score: None,
        max_score: exam.total_marks,
    }
}

/// Moves the bookmark to `index`.
///
/// Range checking deliberately lives in the handler layer, next to the exam
/// it is checked against; this function trusts its input. A caller that
/// skips the guard can desync the bookmark from `exam.questions`.
pub fn update_current_question(mut session: ExamSession, index: usize) -> ExamSession {
    session.current_question_index = index;
    session
}

/// Inserts or overwrites the answer for its question. Ignored once the
/// session is completed (review mode never mutates answers). Correctness is
/// not judged here; the caller grades via `validate_answer` first.
pub fn submit_answer(mut session: ExamSession, answer: UserAnswer) -> ExamSession {
    if session.is_completed {
        return session;
    }
    session.answers.insert(answer.question_id, answer);
    session
}

/// Refreshes elapsed seconds from the start time. Never decreases within a
/// session, even if the clock reads backwards between ticks.
pub fn update_time_spent(mut session: ExamSession, now: DateTime<Utc>) -> ExamSession {
    let elapsed = (now - session.start_time).num_seconds().max(0);
    session.time_spent = session.time_spent.max(elapsed);
    session
}

/// Seals the session. Idempotent: completing an already-completed session
/// just re-stamps the end time.
pub fn complete_session(
    mut session: ExamSession,
    score: Option<i64>,
    now: DateTime<Utc>,
) -> ExamSession {
    session.is_completed = true;
    session.end_time = Some(now);
    if score.is_some() {
        session.score = score;
    }
    session
}

/// True once elapsed time exceeds the exam's limit. The caller polls this
/// (one-second tick) and triggers the silent auto-complete; there is no
/// timer inside the core.
pub fn is_session_expired(session: &ExamSession, exam: &TrialExam, now: DateTime<Utc>) -> bool {
    (now - session.start_time).num_seconds() > exam.time_limit * 60
}

/// Seconds left on the clock, floored at zero.
pub fn remaining_time(session: &ExamSession, exam: &TrialExam, now: DateTime<Utc>) -> i64 {
    let elapsed = (now - session.start_time).num_seconds();
    (exam.time_limit * 60 - elapsed).max(0)
}

/// Grades one answer against its exam question.
///
/// Multiple choice: exact index equality against the (shuffle-remapped)
/// correct index. Short answer: every expected entry must be present and
/// within its inclusive tolerance; a missing field simply fails the check.
pub fn validate_answer(question: &ExamQuestion, payload: &AnswerPayload) -> bool {
    match question.question.question_type {
        QuestionType::MultipleChoice => match (question.correct_index(), payload.multiple_choice_answer)
        {
            (Some(correct), Some(given)) => correct == given,
            _ => false,
        },
        QuestionType::ShortAnswer => {
            let Some(expected) = question.question.expected_answers.as_deref() else {
                return false;
            };
            let Some(given) = &payload.short_answers else {
                return false;
            };
            expected.iter().all(|e| {
                given
                    .get(&e.field)
                    .is_some_and(|&actual| within_tolerance(actual, e.value, e.tolerance))
            })
        }
    }
}

/// Inclusive tolerance check shared by short-answer grading.
pub fn within_tolerance(actual: f64, expected: f64, tolerance: f64) -> bool {
    (actual - expected).abs() <= tolerance
}

/// Aggregates per-mark-value and per-category correctness plus the scored
/// marks. Safe on partially answered sessions and empty categories.
pub fn calculate_results(exam: &TrialExam, session: &ExamSession) -> ExamResults {
    let mut by_mark_value = std::collections::BTreeMap::new();
    let mut by_category = std::collections::BTreeMap::new();
    let mut total_score = 0i64;
    let mut answered = 0usize;

    for q in &exam.questions {
        let correct = session
            .answers
            .get(&q.question.id)
            .map(|a| {
                answered += 1;
                a.is_correct
            })
            .unwrap_or(false);

        let mark_slot: &mut SliceBreakdown = by_mark_value.entry(q.marks).or_default();
        let category_slot: &mut SliceBreakdown =
            by_category.entry(q.question.category).or_default();
        for slot in [mark_slot, category_slot] {
            slot.total += 1;
            slot.marks_available += q.marks;
            if correct {
                slot.correct += 1;
                slot.marks_scored += q.marks;
            }
        }
        if correct {
            total_score += q.marks;
        }
    }

    let max_score = exam.total_marks;
    let percentage = if max_score > 0 {
        total_score as f64 / max_score as f64 * 100.0
    } else {
        0.0
    };

    ExamResults {
        total_score,
        max_score,
        percentage,
        answered,
        by_mark_value,
        by_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{Question, QuestionCategory, ExpectedAnswer};
    use chrono::Duration;
    use sqlx::types::Json;
    use std::collections::HashMap;

    fn mc_exam_question(id: i64, marks: i64, correct: i64) -> ExamQuestion {
        ExamQuestion {
            question: Question {
                id,
                title: format!("Q{id}"),
                description: "desc".to_string(),
                question_type: QuestionType::MultipleChoice,
                category: QuestionCategory::Navigation,
                marks,
                options: Some(Json(vec!["A".into(), "B".into(), "C".into()])),
                correct_answer: Some(Json(serde_json::json!(correct))),
                expected_answers: None,
                created_at: None,
            },
            marks,
            shuffled_options: Some(vec!["A".into(), "B".into(), "C".into()]),
            correct_option_index: Some(correct),
        }
    }

    fn sa_exam_question(id: i64, marks: i64, expected: Vec<ExpectedAnswer>) -> ExamQuestion {
        ExamQuestion {
            question: Question {
                id,
                title: format!("Q{id}"),
                description: "desc".to_string(),
                question_type: QuestionType::ShortAnswer,
                category: QuestionCategory::FlightPlanning,
                marks,
                options: None,
                correct_answer: None,
                expected_answers: Some(Json(expected)),
                created_at: None,
            },
            marks,
            shuffled_options: None,
            correct_option_index: None,
        }
    }

    fn exam(questions: Vec<ExamQuestion>) -> TrialExam {
        let total_marks = questions.iter().map(|q| q.marks).sum();
        TrialExam {
            id: "exam-test-1".to_string(),
            scenario: "test".to_string(),
            seed: 1,
            total_questions: questions.len(),
            total_marks,
            distribution: std::collections::BTreeMap::new(),
            questions,
            created_at: chrono::Utc::now(),
            time_limit: 180,
        }
    }

    fn answer(question_id: i64, choice: i64, correct: bool, now: DateTime<Utc>) -> UserAnswer {
        UserAnswer {
            question_id,
            question_type: QuestionType::MultipleChoice,
            multiple_choice_answer: Some(choice),
            short_answers: None,
            is_correct: correct,
            time_spent: 0,
            timestamp: now,
        }
    }

    #[test]
    fn expired_session_reports_zero_remaining() {
        let exam = exam(vec![mc_exam_question(1, 2, 0)]);
        let now = chrono::Utc::now();
        let mut session = create_session(&exam, None, now);
        session.start_time = now - Duration::minutes(exam.time_limit + 1);

        assert!(is_session_expired(&session, &exam, now));
        assert_eq!(remaining_time(&session, &exam, now), 0);
    }

    #[test]
    fn fresh_session_is_not_expired() {
        let exam = exam(vec![mc_exam_question(1, 2, 0)]);
        let now = chrono::Utc::now();
        let session = create_session(&exam, None, now);
        assert!(!is_session_expired(&session, &exam, now));
        assert_eq!(remaining_time(&session, &exam, now), exam.time_limit * 60);
    }

    #[test]
    fn completion_is_idempotent() {
        let exam = exam(vec![mc_exam_question(1, 2, 0)]);
        let now = chrono::Utc::now();
        let session = create_session(&exam, None, now);
        let session = submit_answer(session, answer(1, 0, true, now));

        let sealed = complete_session(session, Some(2), now);
        assert!(sealed.is_completed);
        assert_eq!(sealed.score, Some(2));

        let later = now + Duration::seconds(5);
        let sealed_again = complete_session(sealed, None, later);
        assert!(sealed_again.is_completed);
        assert_eq!(sealed_again.score, Some(2));
        assert_eq!(sealed_again.end_time, Some(later));
        assert_eq!(sealed_again.answers.len(), 1);
    }

    #[test]
    fn answers_are_frozen_after_completion() {
        let exam = exam(vec![mc_exam_question(1, 2, 0)]);
        let now = chrono::Utc::now();
        let session = create_session(&exam, None, now);
        let session = submit_answer(session, answer(1, 0, true, now));
        let sealed = complete_session(session, Some(2), now);

        let after = submit_answer(sealed, answer(1, 2, false, now));
        assert!(after.answers[&1].is_correct);
    }

    #[test]
    fn resubmission_overwrites_while_in_progress() {
        let exam = exam(vec![mc_exam_question(1, 2, 0)]);
        let now = chrono::Utc::now();
        let session = create_session(&exam, None, now);
        let session = submit_answer(session, answer(1, 2, false, now));
        let session = submit_answer(session, answer(1, 0, true, now));
        assert_eq!(session.answers.len(), 1);
        assert!(session.answers[&1].is_correct);
    }

    #[test]
    fn time_spent_is_monotonic() {
        let exam = exam(vec![mc_exam_question(1, 2, 0)]);
        let now = chrono::Utc::now();
        let session = create_session(&exam, None, now);
        let session = update_time_spent(session, now + Duration::seconds(30));
        assert_eq!(session.time_spent, 30);
        // A clock stepping backwards must not roll elapsed time back.
        let session = update_time_spent(session, now + Duration::seconds(10));
        assert_eq!(session.time_spent, 30);
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        assert!(within_tolerance(100.0, 98.0, 2.0));
        assert!(!within_tolerance(100.0, 98.0, 1.999));
    }

    #[test]
    fn short_answer_requires_every_field() {
        let q = sa_exam_question(
            7,
            3,
            vec![
                ExpectedAnswer {
                    field: "zone_fuel".to_string(),
                    value: 2450.0,
                    tolerance: 50.0,
                    unit: Some("kg".to_string()),
                },
                ExpectedAnswer {
                    field: "eti".to_string(),
                    value: 42.0,
                    tolerance: 1.0,
                    unit: Some("min".to_string()),
                },
            ],
        );

        let complete = AnswerPayload {
            question_id: 7,
            multiple_choice_answer: None,
            short_answers: Some(HashMap::from([
                ("zone_fuel".to_string(), 2420.0),
                ("eti".to_string(), 42.5),
            ])),
        };
        assert!(validate_answer(&q, &complete));

        let missing_field = AnswerPayload {
            question_id: 7,
            multiple_choice_answer: None,
            short_answers: Some(HashMap::from([("zone_fuel".to_string(), 2420.0)])),
        };
        assert!(!validate_answer(&q, &missing_field));

        let out_of_tolerance = AnswerPayload {
            question_id: 7,
            multiple_choice_answer: None,
            short_answers: Some(HashMap::from([
                ("zone_fuel".to_string(), 2501.0),
                ("eti".to_string(), 42.0),
            ])),
        };
        assert!(!validate_answer(&q, &out_of_tolerance));
    }

    #[test]
    fn string_encoded_correct_answers_are_normalized() {
        let mut q = mc_exam_question(3, 1, 2);
        q.question.correct_answer = Some(Json(serde_json::json!("2")));
        q.correct_option_index = None; // options not shuffled in this bank item

        let payload = AnswerPayload {
            question_id: 3,
            multiple_choice_answer: Some(2),
            short_answers: None,
        };
        assert!(validate_answer(&q, &payload));
    }

    #[test]
    fn results_aggregate_marks_and_categories() {
        let exam = exam(vec![
            mc_exam_question(1, 1, 0),
            mc_exam_question(2, 3, 1),
            mc_exam_question(3, 5, 2),
        ]);
        let now = chrono::Utc::now();
        let session = create_session(&exam, None, now);
        let session = submit_answer(session, answer(1, 0, true, now));
        let session = submit_answer(session, answer(2, 0, false, now));
        // Question 3 left unanswered.

        let results = calculate_results(&exam, &session);
        assert_eq!(results.total_score, 1);
        assert_eq!(results.max_score, 9);
        assert_eq!(results.answered, 2);
        assert!((results.percentage - 100.0 / 9.0).abs() < 1e-9);

        let one_mark = &results.by_mark_value[&1];
        assert_eq!((one_mark.total, one_mark.correct), (1, 1));
        let five_mark = &results.by_mark_value[&5];
        assert_eq!((five_mark.total, five_mark.correct), (1, 0));

        let nav = &results.by_category[&QuestionCategory::Navigation];
        assert_eq!(nav.total, 3);
        assert_eq!(nav.marks_scored, 1);
    }

    #[test]
    fn results_on_empty_exam_do_not_divide_by_zero() {
        let exam = exam(vec![]);
        let now = chrono::Utc::now();
        let session = create_session(&exam, None, now);
        let results = calculate_results(&exam, &session);
        assert_eq!(results.percentage, 0.0);
    }
}
