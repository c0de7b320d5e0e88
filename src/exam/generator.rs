// src/exam/generator.rs

use std::fmt;

use crate::config::{EXAM_QUESTION_COUNT, EXAM_TIME_LIMIT_MINUTES};
use crate::exam::rng::Mulberry32;
use crate::models::exam::{ExamQuestion, ExamScenarioConfig, TrialExam};
use crate::models::question::{Question, QuestionFilters};

/// One mark value the (filtered) pool cannot satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkShortage {
    pub marks: i64,
    pub needed: usize,
    pub available: usize,
}

/// Recoverable generation failure: the bank (after filtering) cannot fill
/// the scenario's quotas. Every shortage is collected before failing so the
/// operator sees the complete picture in one message.
#[derive(Debug)]
pub enum GenerationError {
    Shortage(Vec<MarkShortage>),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Shortage(shortages) => {
                write!(f, "insufficient questions in the bank: ")?;
                for (i, s) in shortages.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(
                        f,
                        "need {} {}-mark question{}, only {} available",
                        s.needed,
                        s.marks,
                        if s.needed == 1 { "" } else { "s" },
                        s.available
                    )?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for GenerationError {}

/// Builds a reproducible trial exam from the question pool.
///
/// The whole construction is driven by a single Mulberry32 stream seeded
/// with `seed`: per-mark-value selection shuffles, then each
/// multiple-choice option shuffle (stream continued, never re-seeded), then
/// one final shuffle that interleaves the mark-value blocks. Identical
/// (pool order, scenario, seed) therefore reproduces the identical exam.
pub fn generate_trial_exam(
    pool: &[Question],
    scenario: &ExamScenarioConfig,
    seed: u32,
    filters: Option<&QuestionFilters>,
) -> Result<TrialExam, GenerationError> {
    let filtered: Vec<&Question> = pool
        .iter()
        .filter(|q| filters.is_none_or(|f| f.matches(q.category)))
        .collect();

    let mut rng = Mulberry32::new(seed);
    let mut selected: Vec<&Question> = Vec::with_capacity(EXAM_QUESTION_COUNT);
    let mut shortages: Vec<MarkShortage> = Vec::new();

    // Distribution iterates in ascending mark order (BTreeMap), which is
    // part of the determinism contract.
    for (&marks, &needed) in &scenario.distribution {
        let mut group: Vec<&Question> = filtered.iter().copied().filter(|q| q.marks == marks).collect();
        if group.len() < needed {
            shortages.push(MarkShortage {
                marks,
                needed,
                available: group.len(),
            });
            continue;
        }
        rng.shuffle(&mut group);
        selected.extend(group.into_iter().take(needed));
    }

    if !shortages.is_empty() {
        return Err(GenerationError::Shortage(shortages));
    }

    let mut questions: Vec<ExamQuestion> = selected
        .into_iter()
        .map(|q| assemble_question(q, &mut rng))
        .collect();
    rng.shuffle(&mut questions);

    Ok(TrialExam {
        id: format!("exam-{}-{}", scenario.id, seed),
        scenario: scenario.id.clone(),
        seed,
        total_questions: questions.len(),
        total_marks: scenario.total_marks,
        distribution: scenario.distribution.clone(),
        questions,
        created_at: chrono::Utc::now(),
        time_limit: EXAM_TIME_LIMIT_MINUTES,
    })
}

/// Attaches the per-instance mark value and, for multiple choice, shuffles
/// the option list while tracking where the correct option lands.
fn assemble_question(question: &Question, rng: &mut Mulberry32) -> ExamQuestion {
    let (shuffled_options, correct_option_index) = match (&question.options, question.correct_index())
    {
        (Some(options), Some(correct)) => {
            let mut indexed: Vec<(usize, String)> =
                options.iter().cloned().enumerate().collect();
            rng.shuffle(&mut indexed);
            let new_index = indexed
                .iter()
                .position(|(original, _)| *original == correct as usize)
                .map(|i| i as i64);
            (
                Some(indexed.into_iter().map(|(_, text)| text).collect()),
                new_index,
            )
        }
        _ => (None, None),
    };

    ExamQuestion {
        marks: question.marks,
        question: question.clone(),
        shuffled_options,
        correct_option_index,
    }
}
