use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};

use crate::{
    db::{collections, Database},
    errors::AppResult,
    models::domain::UnitProgress,
};

#[async_trait]
pub trait UnitProgressRepository: Send + Sync {
    async fn find(&self, student_id: &str, unit_id: &str) -> AppResult<Option<UnitProgress>>;
    async fn list_by_student(&self, student_id: &str) -> AppResult<Vec<UnitProgress>>;
    /// Last write wins for concurrent recomputations.
    async fn upsert(&self, progress: UnitProgress) -> AppResult<UnitProgress>;
}

pub struct MongoUnitProgressRepository {
    collection: Collection<UnitProgress>,
}

impl MongoUnitProgressRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(collections::UNIT_PROGRESS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let student_unit_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "unit_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("student_unit_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(student_unit_index).await?;
        log::info!("Created indexes for unit_progress collection");
        Ok(())
    }
}

#[async_trait]
impl UnitProgressRepository for MongoUnitProgressRepository {
    async fn find(&self, student_id: &str, unit_id: &str) -> AppResult<Option<UnitProgress>> {
        let progress = self
            .collection
            .find_one(doc! { "student_id": student_id, "unit_id": unit_id })
            .await?;
        Ok(progress)
    }

    async fn list_by_student(&self, student_id: &str) -> AppResult<Vec<UnitProgress>> {
        let items = self
            .collection
            .find(doc! { "student_id": student_id })
            .sort(doc! { "last_activity_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(items)
    }

    async fn upsert(&self, progress: UnitProgress) -> AppResult<UnitProgress> {
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(
                doc! { "student_id": &progress.student_id, "unit_id": &progress.unit_id },
                &progress,
            )
            .with_options(options)
            .await?;

        Ok(progress)
    }
}
