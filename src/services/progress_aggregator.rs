use std::collections::HashSet;

use chrono::Utc;

use crate::models::domain::{AnswerRecord, Exercise, UnitProgress, UnitStatus, Verdict};

pub struct ProgressAggregator;

impl ProgressAggregator {
    /// Rebuild a student's unit aggregate from the full answer history.
    ///
    /// `previous` carries state that answer records cannot reproduce: the
    /// completion timestamp (completion never regresses) and the last study event.
    pub fn aggregate(
        student_id: &str,
        unit_id: &str,
        exercises: &[Exercise],
        records: &[AnswerRecord],
        studied_course_ids: Vec<String>,
        previous: Option<&UnitProgress>,
        mastery_window: usize,
    ) -> UnitProgress {
        let now = Utc::now();

        let attempts = records.len() as u32;
        let correct = records.iter().filter(|r| r.verdict == Verdict::Correct).count() as u32;
        let incorrect = records.iter().filter(|r| r.verdict == Verdict::Incorrect).count() as u32;
        let pending_review = records
            .iter()
            .filter(|r| r.verdict == Verdict::PendingReview)
            .count() as u32;
        let practiced = records
            .iter()
            .map(|r| r.exercise_id.as_str())
            .collect::<HashSet<_>>()
            .len() as u32;
        let studied = studied_course_ids.len() as u32;

        let solved: HashSet<&str> = records
            .iter()
            .filter(|r| r.is_correct)
            .map(|r| r.exercise_id.as_str())
            .collect();
        // Every exercise counts, including types that are never auto-scored.
        let all_solved = !exercises.is_empty()
            && exercises.iter().all(|e| solved.contains(e.id.as_str()));

        let was_completed = previous.map(UnitProgress::is_completed).unwrap_or(false);
        let status = if was_completed || all_solved {
            UnitStatus::Completed
        } else if attempts > 0 || studied > 0 {
            UnitStatus::InProgress
        } else {
            UnitStatus::NotStarted
        };

        let completed_at = match status {
            UnitStatus::Completed => previous.and_then(|p| p.completed_at).or(Some(now)),
            _ => None,
        };

        let latest_record = records.iter().map(|r| r.submitted_at).max();
        let last_activity_at = latest_record.max(previous.and_then(|p| p.last_activity_at));

        UnitProgress {
            student_id: student_id.to_string(),
            unit_id: unit_id.to_string(),
            attempts,
            practiced,
            correct,
            incorrect,
            pending_review,
            studied,
            studied_course_ids,
            mastery_score: mastery_score(records, mastery_window),
            status,
            completed_at,
            last_activity_at,
            updated_at: now,
        }
    }
}

/// Recency-weighted share of correct answers over the last `window` scored records.
///
/// Inside the window the oldest record weighs 1 and the newest weighs `n`.
/// Records awaiting review are not scored.
pub fn mastery_score(records: &[AnswerRecord], window: usize) -> f64 {
    let mut scored: Vec<&AnswerRecord> = records
        .iter()
        .filter(|r| r.verdict != Verdict::PendingReview)
        .collect();
    scored.sort_by_key(|r| r.submitted_at);

    let recent = &scored[scored.len().saturating_sub(window.max(1))..];
    if recent.is_empty() {
        return 0.0;
    }

    let (hits, total) = recent
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(hits, total), (i, record)| {
            let weight = (i + 1) as f64;
            let hit = if record.is_correct { weight } else { 0.0 };
            (hits + hit, total + weight)
        });

    hits / total
}
