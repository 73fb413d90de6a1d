use async_trait::async_trait;
use futures::TryStreamExt;
#[cfg(test)]
use mockall::automock;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::Exercise,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ExerciseRepository: Send + Sync {
    async fn create(&self, exercise: Exercise) -> AppResult<Exercise>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Exercise>>;
    async fn list_by_unit(&self, unit_id: &str) -> AppResult<Vec<Exercise>>;
    async fn count_by_unit(&self, unit_id: &str) -> AppResult<u64>;
    async fn update(&self, exercise: Exercise) -> AppResult<Exercise>;
    async fn delete(&self, id: &str) -> AppResult<()>;
}

pub struct MongoExerciseRepository {
    collection: Collection<Exercise>,
}

impl MongoExerciseRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(collections::EXERCISES);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for exercises collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let unit_index = IndexModel::builder()
            .keys(doc! { "unit_id": 1, "order": 1 })
            .options(IndexOptions::builder().name("unit_order".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(unit_index).await?;

        log::info!("Successfully created indexes for exercises collection");
        Ok(())
    }
}

#[async_trait]
impl ExerciseRepository for MongoExerciseRepository {
    async fn create(&self, exercise: Exercise) -> AppResult<Exercise> {
        self.collection.insert_one(&exercise).await?;
        Ok(exercise)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Exercise>> {
        let exercise = self.collection.find_one(doc! { "id": id }).await?;
        Ok(exercise)
    }

    async fn list_by_unit(&self, unit_id: &str) -> AppResult<Vec<Exercise>> {
        let exercises = self
            .collection
            .find(doc! { "unit_id": unit_id })
            .sort(doc! { "order": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(exercises)
    }

    async fn count_by_unit(&self, unit_id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "unit_id": unit_id })
            .await?;
        Ok(count)
    }

    async fn update(&self, exercise: Exercise) -> AppResult<Exercise> {
        let result = self
            .collection
            .replace_one(doc! { "id": &exercise.id }, &exercise)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Exercise '{}' not found", exercise.id)));
        }
        Ok(exercise)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Exercise '{}' not found", id)));
        }
        Ok(())
    }
}
