use async_graphql::Enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Outcome of grading a single submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
    PendingReview,
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct)
    }

    pub fn from_bool(correct: bool) -> Self {
        if correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }
}

/// Append-only log entry. Never mutated after insertion.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AnswerRecord {
    pub id: String,
    pub student_id: String,
    pub exercise_id: String,
    pub unit_id: String,
    pub submitted_answer: Value,
    pub verdict: Verdict,
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<i64>,
    pub attempt_number: i32,
    #[serde(with = "crate::models::domain::timestamp")]
    pub submitted_at: DateTime<Utc>,
}

impl AnswerRecord {
    pub fn new(
        student_id: &str,
        exercise_id: &str,
        unit_id: &str,
        submitted_answer: Value,
        verdict: Verdict,
        response_time_ms: Option<i64>,
        attempt_number: i32,
    ) -> Self {
        AnswerRecord {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            exercise_id: exercise_id.to_string(),
            unit_id: unit_id.to_string(),
            submitted_answer,
            is_correct: verdict.is_correct(),
            verdict,
            response_time_ms,
            attempt_number,
            submitted_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn correctness_flag_follows_verdict() {
        let pending = AnswerRecord::new("s", "e", "u", json!("essay"), Verdict::PendingReview, None, 1);
        assert!(!pending.is_correct);

        let correct = AnswerRecord::new("s", "e", "u", json!(1), Verdict::Correct, Some(800), 2);
        assert!(correct.is_correct);
        assert_eq!(correct.attempt_number, 2);
    }

    #[test]
    fn verdict_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Verdict::PendingReview).unwrap(),
            "\"pending_review\""
        );
        assert_eq!(Verdict::from_bool(false), Verdict::Incorrect);
    }
}
