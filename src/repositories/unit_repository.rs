use async_trait::async_trait;
use futures::TryStreamExt;
#[cfg(test)]
use mockall::automock;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::Unit,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UnitRepository: Send + Sync {
    async fn create(&self, unit: Unit) -> AppResult<Unit>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Unit>>;
    async fn list_by_subject(&self, subject_id: &str) -> AppResult<Vec<Unit>>;
    async fn count_by_subject(&self, subject_id: &str) -> AppResult<u64>;
    async fn update(&self, unit: Unit) -> AppResult<Unit>;
    async fn delete(&self, id: &str) -> AppResult<()>;
}

pub struct MongoUnitRepository {
    collection: Collection<Unit>,
}

impl MongoUnitRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(collections::UNITS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let subject_index = IndexModel::builder()
            .keys(doc! { "subject_id": 1, "order": 1 })
            .options(IndexOptions::builder().name("subject_order".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(subject_index).await?;
        log::info!("Created indexes for units collection");
        Ok(())
    }
}

#[async_trait]
impl UnitRepository for MongoUnitRepository {
    async fn create(&self, unit: Unit) -> AppResult<Unit> {
        self.collection.insert_one(&unit).await?;
        Ok(unit)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Unit>> {
        let unit = self.collection.find_one(doc! { "id": id }).await?;
        Ok(unit)
    }

    async fn list_by_subject(&self, subject_id: &str) -> AppResult<Vec<Unit>> {
        let units = self
            .collection
            .find(doc! { "subject_id": subject_id })
            .sort(doc! { "order": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(units)
    }

    async fn count_by_subject(&self, subject_id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "subject_id": subject_id })
            .await?;
        Ok(count)
    }

    async fn update(&self, unit: Unit) -> AppResult<Unit> {
        let result = self
            .collection
            .replace_one(doc! { "id": &unit.id }, &unit)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Unit '{}' not found", unit.id)));
        }
        Ok(unit)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Unit '{}' not found", id)));
        }
        Ok(())
    }
}
