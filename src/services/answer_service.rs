use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{AnswerRecord, UserRole, Verdict},
        dto::{
            request::{PaginationParams, SubmitAnswerRequest},
            response::{PaginatedResponse, SubmissionOutcome},
        },
    },
    repositories::{AnswerRecordRepository, ErrorBookRepository, ExerciseRepository, UserRepository},
    services::{
        evaluator::{validate_submission, AnswerEvaluator},
        progress_service::ProgressService,
        task_service::TaskService,
    },
};

pub struct AnswerService {
    exercises: Arc<dyn ExerciseRepository>,
    users: Arc<dyn UserRepository>,
    answer_records: Arc<dyn AnswerRecordRepository>,
    error_book: Arc<dyn ErrorBookRepository>,
    progress_service: Arc<ProgressService>,
    task_service: Arc<TaskService>,
}

impl AnswerService {
    pub fn new(
        exercises: Arc<dyn ExerciseRepository>,
        users: Arc<dyn UserRepository>,
        answer_records: Arc<dyn AnswerRecordRepository>,
        error_book: Arc<dyn ErrorBookRepository>,
        progress_service: Arc<ProgressService>,
        task_service: Arc<TaskService>,
    ) -> Self {
        Self {
            exercises,
            users,
            answer_records,
            error_book,
            progress_service,
            task_service,
        }
    }

    /// Grade one answer and fold it into the student's records.
    ///
    /// Nothing is written unless the exercise and student exist and the answer
    /// has a shape the exercise type accepts.
    pub async fn submit(
        &self,
        student_id: &str,
        exercise_id: &str,
        request: SubmitAnswerRequest,
    ) -> AppResult<SubmissionOutcome> {
        request.validate()?;

        let exercise = self
            .exercises
            .find_by_id(exercise_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Exercise with id '{}' not found", exercise_id)))?;
        let student = self
            .users
            .find_by_id(student_id)
            .await?
            .filter(|user| user.role == UserRole::Student)
            .ok_or_else(|| AppError::NotFound(format!("Student with id '{}' not found", student_id)))?;

        validate_submission(exercise.exercise_type, &request.answer)?;

        let verdict = AnswerEvaluator::evaluate(
            exercise.exercise_type,
            &request.answer,
            &exercise.correct_answer,
        );

        let previous_attempts = self
            .answer_records
            .count_for_exercise(&student.id, &exercise.id)
            .await?;
        let already_solved = verdict.is_correct()
            && self
                .answer_records
                .has_correct(&student.id, &exercise.id)
                .await?;

        let attempt_number = next_attempt_number(previous_attempts)?;
        let record = self
            .answer_records
            .create(AnswerRecord::new(
                &student.id,
                &exercise.id,
                &exercise.unit_id,
                request.answer,
                verdict,
                request.response_time_ms,
                attempt_number,
            ))
            .await?;

        if verdict == Verdict::Incorrect {
            let entry = self
                .error_book
                .record_miss(&student.id, &exercise.id, &exercise.unit_id, &record.submitted_answer)
                .await?;
            log::debug!(
                "error book entry for {} on {} now at {} miss(es)",
                student.id,
                exercise.id,
                entry.wrong_count
            );
        }

        let mut points_awarded = 0;
        if verdict.is_correct() && !already_solved {
            points_awarded = i64::from(exercise.points);
            self.users.add_points(&student.id, points_awarded).await?;
        }

        let progress = self
            .progress_service
            .recompute(&student.id, &exercise.unit_id)
            .await?;
        if progress.is_completed() {
            self.task_service
                .close_for_unit(&student.id, &exercise.unit_id)
                .await?;
        }

        Ok(SubmissionOutcome {
            record_id: record.id,
            exercise_id: exercise.id,
            verdict,
            correct: verdict.is_correct(),
            attempt_number: record.attempt_number,
            points_awarded,
            explanation: exercise.explanation,
            progress,
        })
    }

    /// A student's answer records, newest first.
    pub async fn history(
        &self,
        student_id: &str,
        unit_id: Option<String>,
        pagination: &PaginationParams,
    ) -> AppResult<PaginatedResponse<AnswerRecord>> {
        pagination.validate()?;
        let (offset, limit) = (pagination.offset(), pagination.limit());

        let (items, total) = self
            .answer_records
            .list_by_student(student_id, unit_id, offset, limit)
            .await?;

        Ok(PaginatedResponse {
            items,
            total,
            offset,
            limit,
        })
    }
}

/// 1-based number of the submission that follows `previous` earlier ones.
fn next_attempt_number(previous: u64) -> AppResult<i32> {
    i32::try_from(previous)
        .ok()
        .and_then(|n| n.checked_add(1))
        .ok_or_else(|| AppError::InternalError(format!("Attempt counter overflow after {} submissions", previous)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_numbers_start_at_one() {
        assert_eq!(next_attempt_number(0).unwrap(), 1);
        assert_eq!(next_attempt_number(41).unwrap(), 42);
    }

    #[test]
    fn attempt_counter_overflow_is_an_error_not_a_wrap() {
        assert_eq!(next_attempt_number(i32::MAX as u64 - 1).unwrap(), i32::MAX);
        for previous in [i32::MAX as u64, u64::MAX] {
            assert!(matches!(
                next_attempt_number(previous),
                Err(AppError::InternalError(_))
            ));
        }
    }
}
