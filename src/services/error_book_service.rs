use std::{collections::HashMap, sync::Arc};

use crate::{
    errors::AppResult,
    models::{
        domain::ErrorBookEntry,
        dto::response::{ErrorBookItem, ExerciseView},
    },
    repositories::{ErrorBookRepository, ExerciseRepository},
};

pub struct ErrorBookService {
    repository: Arc<dyn ErrorBookRepository>,
    exercises: Arc<dyn ExerciseRepository>,
}

impl ErrorBookService {
    pub fn new(
        repository: Arc<dyn ErrorBookRepository>,
        exercises: Arc<dyn ExerciseRepository>,
    ) -> Self {
        Self {
            repository,
            exercises,
        }
    }

    /// Newest miss first; mastered entries only when asked for.
    pub async fn list_entries(
        &self,
        student_id: &str,
        include_mastered: bool,
    ) -> AppResult<Vec<ErrorBookEntry>> {
        let mut entries = self
            .repository
            .list_by_student(student_id, include_mastered)
            .await?;
        entries.sort_by(|a, b| b.last_wrong_at.cmp(&a.last_wrong_at));
        Ok(entries)
    }

    /// Entries joined with the exercise they refer to, for review screens.
    pub async fn list_with_exercises(
        &self,
        student_id: &str,
        include_mastered: bool,
    ) -> AppResult<Vec<ErrorBookItem>> {
        let entries = self.list_entries(student_id, include_mastered).await?;

        let mut views: HashMap<String, ExerciseView> = HashMap::new();
        for entry in &entries {
            if views.contains_key(&entry.exercise_id) {
                continue;
            }
            if let Some(exercise) = self.exercises.find_by_id(&entry.exercise_id).await? {
                views.insert(entry.exercise_id.clone(), exercise.into());
            }
        }

        Ok(entries
            .into_iter()
            .map(|entry| ErrorBookItem {
                exercise: views.get(&entry.exercise_id).cloned(),
                entry,
            })
            .collect())
    }

    pub async fn mark_mastered(&self, student_id: &str, exercise_id: &str) -> AppResult<ErrorBookEntry> {
        let entry = self.repository.mark_mastered(student_id, exercise_id).await?;
        log::debug!("student {} mastered exercise {}", student_id, exercise_id);
        Ok(entry)
    }

    pub async fn remove(&self, student_id: &str, exercise_id: &str) -> AppResult<()> {
        self.repository.delete(student_id, exercise_id).await
    }
}
