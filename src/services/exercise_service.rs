use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Exercise, DEFAULT_EXERCISE_POINTS},
        dto::{
            request::{CreateExerciseRequest, UpdateExerciseRequest},
            response::ExerciseView,
        },
    },
    repositories::{AnswerRecordRepository, ExerciseRepository, UnitRepository},
    services::evaluator::validate_correct_answer,
};

pub struct ExerciseService {
    repository: Arc<dyn ExerciseRepository>,
    units: Arc<dyn UnitRepository>,
    answer_records: Arc<dyn AnswerRecordRepository>,
}

impl ExerciseService {
    pub fn new(
        repository: Arc<dyn ExerciseRepository>,
        units: Arc<dyn UnitRepository>,
        answer_records: Arc<dyn AnswerRecordRepository>,
    ) -> Self {
        Self {
            repository,
            units,
            answer_records,
        }
    }

    pub async fn get_exercise(&self, id: &str) -> AppResult<Exercise> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Exercise with id '{}' not found", id)))
    }

    pub async fn get_view(&self, id: &str) -> AppResult<ExerciseView> {
        self.get_exercise(id).await.map(ExerciseView::from)
    }

    /// Exercises of a unit as students see them.
    pub async fn list_views(&self, unit_id: &str) -> AppResult<Vec<ExerciseView>> {
        self.ensure_unit(unit_id).await?;
        let exercises = self.repository.list_by_unit(unit_id).await?;
        Ok(exercises.into_iter().map(ExerciseView::from).collect())
    }

    pub async fn list_full(&self, unit_id: &str) -> AppResult<Vec<Exercise>> {
        self.ensure_unit(unit_id).await?;
        self.repository.list_by_unit(unit_id).await
    }

    pub async fn create_exercise(&self, request: CreateExerciseRequest) -> AppResult<Exercise> {
        request.validate()?;
        validate_correct_answer(request.exercise_type, &request.correct_answer)?;
        self.ensure_unit(&request.unit_id).await?;

        let mut exercise = Exercise::new(
            &request.unit_id,
            request.exercise_type,
            &request.prompt,
            request.correct_answer,
        );
        exercise.course_id = request.course_id;
        exercise.options = request.options;
        exercise.explanation = request.explanation;
        exercise.knowledge_points = request.knowledge_points;
        exercise.points = request.points.unwrap_or(DEFAULT_EXERCISE_POINTS);
        exercise.order = request.order.unwrap_or(0);

        let exercise = self.repository.create(exercise).await?;
        log::info!(
            "created {} exercise {} in unit {}",
            exercise.exercise_type.as_str(),
            exercise.id,
            exercise.unit_id
        );
        Ok(exercise)
    }

    pub async fn update_exercise(
        &self,
        id: &str,
        request: UpdateExerciseRequest,
    ) -> AppResult<Exercise> {
        request.validate()?;

        let mut exercise = self.get_exercise(id).await?;
        self.ensure_unanswered(&exercise).await?;

        if let Some(exercise_type) = request.exercise_type {
            exercise.exercise_type = exercise_type;
        }
        if let Some(prompt) = request.prompt {
            exercise.prompt = prompt;
        }
        if let Some(options) = request.options {
            exercise.options = options;
        }
        if let Some(correct_answer) = request.correct_answer {
            exercise.correct_answer = correct_answer;
        }
        if let Some(explanation) = request.explanation {
            exercise.explanation = Some(explanation);
        }
        if let Some(knowledge_points) = request.knowledge_points {
            exercise.knowledge_points = knowledge_points;
        }
        if let Some(points) = request.points {
            exercise.points = points;
        }
        if let Some(order) = request.order {
            exercise.order = order;
        }
        validate_correct_answer(exercise.exercise_type, &exercise.correct_answer)?;
        exercise.modified_at = Some(Utc::now());

        self.repository.update(exercise).await
    }

    pub async fn delete_exercise(&self, id: &str) -> AppResult<()> {
        let exercise = self.get_exercise(id).await?;
        self.ensure_unanswered(&exercise).await?;
        self.repository.delete(&exercise.id).await
    }

    async fn ensure_unit(&self, unit_id: &str) -> AppResult<()> {
        match self.units.find_by_id(unit_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("Unit with id '{}' not found", unit_id))),
        }
    }

    // Answer records point at the exercise as it was graded.
    async fn ensure_unanswered(&self, exercise: &Exercise) -> AppResult<()> {
        if self.answer_records.exists_for_exercise(&exercise.id).await? {
            return Err(AppError::Conflict(format!(
                "Exercise '{}' already has answers and can no longer change",
                exercise.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::{ExerciseType, Unit},
        repositories::{
            answer_record_repository::MockAnswerRecordRepository,
            exercise_repository::MockExerciseRepository, unit_repository::MockUnitRepository,
        },
    };
    use serde_json::json;

    fn choice_exercise() -> Exercise {
        let mut exercise = Exercise::new("unit-1", ExerciseType::Choice, "2 + 2 = ?", json!(2));
        exercise.id = "ex-1".to_string();
        exercise
    }

    fn service(
        exercises: MockExerciseRepository,
        units: MockUnitRepository,
        answers: MockAnswerRecordRepository,
    ) -> ExerciseService {
        ExerciseService::new(Arc::new(exercises), Arc::new(units), Arc::new(answers))
    }

    fn update_prompt() -> UpdateExerciseRequest {
        UpdateExerciseRequest {
            exercise_type: None,
            prompt: Some("3 + 1 = ?".to_string()),
            options: None,
            correct_answer: None,
            explanation: None,
            knowledge_points: None,
            points: None,
            order: None,
        }
    }

    #[tokio::test]
    async fn update_is_rejected_once_answered() {
        let mut exercises = MockExerciseRepository::new();
        exercises
            .expect_find_by_id()
            .returning(|_| Ok(Some(choice_exercise())));
        exercises.expect_update().never();

        let mut answers = MockAnswerRecordRepository::new();
        answers.expect_exists_for_exercise().returning(|_| Ok(true));

        let service = service(exercises, MockUnitRepository::new(), answers);
        let result = service.update_exercise("ex-1", update_prompt()).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn update_applies_fields_while_unanswered() {
        let mut exercises = MockExerciseRepository::new();
        exercises
            .expect_find_by_id()
            .returning(|_| Ok(Some(choice_exercise())));
        exercises
            .expect_update()
            .times(1)
            .returning(|exercise| Ok(exercise));

        let mut answers = MockAnswerRecordRepository::new();
        answers.expect_exists_for_exercise().returning(|_| Ok(false));

        let service = service(exercises, MockUnitRepository::new(), answers);
        let updated = service.update_exercise("ex-1", update_prompt()).await.unwrap();

        assert_eq!(updated.prompt, "3 + 1 = ?");
        assert_eq!(updated.correct_answer, json!(2));
    }

    #[tokio::test]
    async fn delete_is_rejected_once_answered() {
        let mut exercises = MockExerciseRepository::new();
        exercises
            .expect_find_by_id()
            .returning(|_| Ok(Some(choice_exercise())));
        exercises.expect_delete().never();

        let mut answers = MockAnswerRecordRepository::new();
        answers.expect_exists_for_exercise().returning(|_| Ok(true));

        let service = service(exercises, MockUnitRepository::new(), answers);
        assert!(matches!(
            service.delete_exercise("ex-1").await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn create_rejects_malformed_answer_key() {
        let mut units = MockUnitRepository::new();
        units.expect_find_by_id().never();

        let service = service(MockExerciseRepository::new(), units, MockAnswerRecordRepository::new());
        let request = CreateExerciseRequest {
            unit_id: "unit-1".to_string(),
            course_id: None,
            exercise_type: ExerciseType::FillBlank,
            prompt: "Fill in".to_string(),
            options: Vec::new(),
            correct_answer: json!("not a list"),
            explanation: None,
            knowledge_points: Vec::new(),
            points: None,
            order: None,
        };

        assert!(matches!(
            service.create_exercise(request).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn create_requires_existing_unit() {
        let mut units = MockUnitRepository::new();
        units.expect_find_by_id().returning(|_| Ok(None::<Unit>));

        let service = service(MockExerciseRepository::new(), units, MockAnswerRecordRepository::new());
        let request = CreateExerciseRequest {
            unit_id: "missing".to_string(),
            course_id: None,
            exercise_type: ExerciseType::Choice,
            prompt: "Pick one".to_string(),
            options: vec!["a".into(), "b".into()],
            correct_answer: json!(1),
            explanation: None,
            knowledge_points: Vec::new(),
            points: None,
            order: None,
        };

        assert!(matches!(
            service.create_exercise(request).await,
            Err(AppError::NotFound(_))
        ));
    }
}
