//! Answer grading for every exercise type.
//!
//! Grading is a pure function of the exercise type, the stored correct answer and
//! the submitted answer. It never fails: malformed stored answers grade as
//! incorrect and leave a warning in the log.

use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{ExerciseType, Verdict};

pub struct AnswerEvaluator;

impl AnswerEvaluator {
    pub fn evaluate(exercise_type: ExerciseType, submitted: &Value, correct: &Value) -> Verdict {
        match exercise_type {
            ExerciseType::Choice => Verdict::from_bool(Self::grade_choice(submitted, correct)),
            ExerciseType::Matching | ExerciseType::DragDrop => {
                Verdict::from_bool(Self::grade_structural(exercise_type, submitted, correct))
            }
            ExerciseType::FillBlank => Verdict::from_bool(Self::grade_fill_blank(submitted, correct)),
            ExerciseType::Application => Verdict::PendingReview,
            // No grader exists for these yet, so they never score.
            ExerciseType::Sort | ExerciseType::Math => Verdict::Incorrect,
        }
    }

    /// A negative index is the "unanswered" sentinel and never matches.
    fn grade_choice(submitted: &Value, correct: &Value) -> bool {
        let Some(expected) = correct.as_i64() else {
            log::warn!("choice exercise has a non-integer correct answer: {}", correct);
            return false;
        };

        match submitted.as_i64() {
            Some(index) if index >= 0 => index == expected,
            _ => false,
        }
    }

    /// Ordered sequences or index mappings must match exactly; no partial credit.
    fn grade_structural(exercise_type: ExerciseType, submitted: &Value, correct: &Value) -> bool {
        if !(correct.is_array() || correct.is_object()) {
            log::warn!(
                "{} exercise has a malformed correct answer: {}",
                exercise_type.as_str(),
                correct
            );
            return false;
        }

        submitted == correct
    }

    /// Every blank must match after trimming; comparison stays case-sensitive.
    fn grade_fill_blank(submitted: &Value, correct: &Value) -> bool {
        let Some(expected) = string_list(correct) else {
            log::warn!("fill_blank exercise has a malformed correct answer: {}", correct);
            return false;
        };
        let Some(given) = string_list(submitted) else {
            return false;
        };

        expected.len() == given.len()
            && expected
                .iter()
                .zip(given.iter())
                .all(|(want, got)| want.trim() == got.trim())
    }
}

fn string_list(value: &Value) -> Option<Vec<&str>> {
    value
        .as_array()?
        .iter()
        .map(Value::as_str)
        .collect::<Option<Vec<_>>>()
}

fn is_integer(value: &Value) -> bool {
    value.is_i64() || value.is_u64()
}

/// Reject submissions whose JSON shape cannot belong to the exercise type.
pub fn validate_submission(exercise_type: ExerciseType, answer: &Value) -> AppResult<()> {
    let valid = match exercise_type {
        ExerciseType::Choice => is_integer(answer),
        ExerciseType::Matching | ExerciseType::DragDrop => match answer {
            Value::Array(items) => items.iter().all(is_integer),
            Value::Object(map) => map.values().all(is_integer),
            _ => false,
        },
        ExerciseType::FillBlank => string_list(answer).is_some(),
        ExerciseType::Sort => answer.is_array(),
        ExerciseType::Math => answer.is_number() || answer.is_string(),
        ExerciseType::Application => answer.is_string(),
    };

    if valid {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "answer has the wrong shape for a {} exercise",
            exercise_type.as_str()
        )))
    }
}

/// Check a stored correct answer before an exercise is saved.
pub fn validate_correct_answer(exercise_type: ExerciseType, correct: &Value) -> AppResult<()> {
    match exercise_type {
        ExerciseType::Choice if correct.as_i64().map(|i| i < 0).unwrap_or(false) => {
            Err(AppError::ValidationError(
                "choice exercise needs a non-negative correct index".to_string(),
            ))
        }
        ExerciseType::Application if correct.is_null() => Ok(()),
        _ => validate_submission(exercise_type, correct),
    }
}
