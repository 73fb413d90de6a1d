use std::sync::Arc;

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{UnitProgress, UserRole},
    repositories::{
        AnswerRecordRepository, CourseRepository, ExerciseRepository, UnitProgressRepository,
        UserRepository,
    },
    services::progress_aggregator::ProgressAggregator,
};

pub struct ProgressService {
    exercises: Arc<dyn ExerciseRepository>,
    courses: Arc<dyn CourseRepository>,
    answer_records: Arc<dyn AnswerRecordRepository>,
    progress: Arc<dyn UnitProgressRepository>,
    users: Arc<dyn UserRepository>,
    mastery_window: usize,
}

impl ProgressService {
    pub fn new(
        exercises: Arc<dyn ExerciseRepository>,
        courses: Arc<dyn CourseRepository>,
        answer_records: Arc<dyn AnswerRecordRepository>,
        progress: Arc<dyn UnitProgressRepository>,
        users: Arc<dyn UserRepository>,
        mastery_window: usize,
    ) -> Self {
        Self {
            exercises,
            courses,
            answer_records,
            progress,
            users,
            mastery_window,
        }
    }

    /// Rebuild and store the (student, unit) aggregate from the full answer history.
    pub async fn recompute(&self, student_id: &str, unit_id: &str) -> AppResult<UnitProgress> {
        let previous = self.progress.find(student_id, unit_id).await?;
        self.rebuild(student_id, unit_id, previous).await
    }

    /// Add a course to the studied set. Repeats are no-ops apart from the activity time.
    pub async fn mark_course_studied(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> AppResult<UnitProgress> {
        self.users
            .find_by_id(student_id)
            .await?
            .filter(|user| user.role == UserRole::Student)
            .ok_or_else(|| AppError::NotFound(format!("Student with id '{}' not found", student_id)))?;
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course '{}' not found", course_id)))?;

        let mut previous = self
            .progress
            .find(student_id, &course.unit_id)
            .await?
            .unwrap_or_else(|| UnitProgress::empty(student_id, &course.unit_id));

        if !previous.studied_course_ids.contains(&course.id) {
            previous.studied_course_ids.push(course.id.clone());
        }
        previous.last_activity_at = Some(Utc::now());

        log::debug!("student {} studied course {}", student_id, course.id);
        self.rebuild(student_id, &course.unit_id, Some(previous)).await
    }

    pub async fn get_unit_progress(&self, student_id: &str, unit_id: &str) -> AppResult<UnitProgress> {
        Ok(self
            .progress
            .find(student_id, unit_id)
            .await?
            .unwrap_or_else(|| UnitProgress::empty(student_id, unit_id)))
    }

    pub async fn list_for_student(&self, student_id: &str) -> AppResult<Vec<UnitProgress>> {
        self.progress.list_by_student(student_id).await
    }

    async fn rebuild(
        &self,
        student_id: &str,
        unit_id: &str,
        previous: Option<UnitProgress>,
    ) -> AppResult<UnitProgress> {
        let exercises = self.exercises.list_by_unit(unit_id).await?;
        let records = self
            .answer_records
            .list_by_student_and_unit(student_id, unit_id)
            .await?;
        let studied = previous
            .as_ref()
            .map(|p| p.studied_course_ids.clone())
            .unwrap_or_default();

        let progress = ProgressAggregator::aggregate(
            student_id,
            unit_id,
            &exercises,
            &records,
            studied,
            previous.as_ref(),
            self.mastery_window,
        );

        if progress.is_completed() && !previous.as_ref().map(UnitProgress::is_completed).unwrap_or(false) {
            log::info!("student {} completed unit {}", student_id, unit_id);
        }

        self.progress.upsert(progress).await
    }
}
