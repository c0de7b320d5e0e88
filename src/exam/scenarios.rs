// src/exam/scenarios.rs

use std::collections::BTreeMap;
use std::fmt;

use crate::config::EXAM_QUESTION_COUNT;
use crate::models::exam::ExamScenarioConfig;

/// A scenario whose quota sums are inconsistent. This is a configuration
/// bug, not a runtime condition: the table refuses to build and startup
/// fails.
#[derive(Debug)]
pub struct ScenarioConfigError {
    pub scenario_id: String,
    pub reason: String,
}

impl fmt::Display for ScenarioConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scenario '{}' is invalid: {}", self.scenario_id, self.reason)
    }
}

impl std::error::Error for ScenarioConfigError {}

/// Validated collection of exam scenarios. Constructed explicitly at
/// startup (no import-time statics) so a broken config can never be
/// silently used.
#[derive(Debug, Clone)]
pub struct ScenarioTable {
    scenarios: Vec<ExamScenarioConfig>,
}

impl ScenarioTable {
    /// Builds the built-in scenario set, validating every entry.
    pub fn builtin() -> Result<Self, ScenarioConfigError> {
        Self::new(vec![
            scenario(
                "standard",
                "Standard trial exam",
                47,
                [(1, 3), (2, 5), (3, 4), (4, 3), (5, 2)],
                "Balanced spread across mark values, matching the CASA trial paper profile.",
            ),
            scenario(
                "light",
                "Confidence builder",
                38,
                [(1, 6), (2, 5), (3, 3), (4, 2), (5, 1)],
                "Weighted toward 1- and 2-mark questions for early study sessions.",
            ),
            scenario(
                "heavy",
                "Exam-day simulation",
                56,
                [(1, 2), (2, 3), (3, 4), (4, 4), (5, 4)],
                "Weighted toward long-form 4- and 5-mark flight-plan questions.",
            ),
        ])
    }

    /// Wraps a scenario list, rejecting any entry whose distribution does
    /// not sum to the fixed question count or whose weighted sum disagrees
    /// with its declared total marks.
    pub fn new(scenarios: Vec<ExamScenarioConfig>) -> Result<Self, ScenarioConfigError> {
        for s in &scenarios {
            let question_count: usize = s.distribution.values().sum();
            if question_count != EXAM_QUESTION_COUNT {
                return Err(ScenarioConfigError {
                    scenario_id: s.id.clone(),
                    reason: format!(
                        "distribution sums to {} questions, expected {}",
                        question_count, EXAM_QUESTION_COUNT
                    ),
                });
            }
            let weighted: i64 = s.distribution.iter().map(|(m, c)| m * *c as i64).sum();
            if weighted != s.total_marks {
                return Err(ScenarioConfigError {
                    scenario_id: s.id.clone(),
                    reason: format!(
                        "distribution is worth {} marks, declared total is {}",
                        weighted, s.total_marks
                    ),
                });
            }
        }
        Ok(Self { scenarios })
    }

    pub fn get(&self, id: &str) -> Option<&ExamScenarioConfig> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn all(&self) -> &[ExamScenarioConfig] {
        &self.scenarios
    }
}

fn scenario<const N: usize>(
    id: &str,
    label: &str,
    total_marks: i64,
    distribution: [(i64, usize); N],
    description: &str,
) -> ExamScenarioConfig {
    ExamScenarioConfig {
        id: id.to_string(),
        label: label.to_string(),
        total_marks,
        distribution: BTreeMap::from(distribution),
        description: description.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_scenarios_satisfy_invariants() {
        let table = ScenarioTable::builtin().expect("built-in scenarios must validate");
        assert!(!table.all().is_empty());
        for s in table.all() {
            let count: usize = s.distribution.values().sum();
            assert_eq!(count, EXAM_QUESTION_COUNT, "scenario {}", s.id);
            let weighted: i64 = s.distribution.iter().map(|(m, c)| m * *c as i64).sum();
            assert_eq!(weighted, s.total_marks, "scenario {}", s.id);
        }
    }

    #[test]
    fn wrong_question_count_is_rejected() {
        let bad = scenario("bad", "Bad", 16, [(1, 16)], "sums to 16 questions");
        let err = ScenarioTable::new(vec![bad]).unwrap_err();
        assert!(err.to_string().contains("16 questions"));
    }

    #[test]
    fn wrong_mark_total_is_rejected() {
        let bad = scenario(
            "bad-marks",
            "Bad marks",
            99,
            [(1, 3), (2, 5), (3, 4), (4, 3), (5, 2)],
            "declared total disagrees with distribution",
        );
        let err = ScenarioTable::new(vec![bad]).unwrap_err();
        assert!(err.to_string().contains("declared total is 99"));
    }

    #[test]
    fn lookup_by_id() {
        let table = ScenarioTable::builtin().unwrap();
        assert!(table.get("standard").is_some());
        assert!(table.get("nonexistent").is_none());
    }
}
