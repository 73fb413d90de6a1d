use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::{timestamp, ErrorBookEntry},
};

#[async_trait]
pub trait ErrorBookRepository: Send + Sync {
    /// Create the entry on the first miss, otherwise bump its counter and reopen it.
    async fn record_miss(
        &self,
        student_id: &str,
        exercise_id: &str,
        unit_id: &str,
        answer: &Value,
    ) -> AppResult<ErrorBookEntry>;
    async fn find(&self, student_id: &str, exercise_id: &str) -> AppResult<Option<ErrorBookEntry>>;
    async fn list_by_student(
        &self,
        student_id: &str,
        include_mastered: bool,
    ) -> AppResult<Vec<ErrorBookEntry>>;
    async fn mark_mastered(&self, student_id: &str, exercise_id: &str) -> AppResult<ErrorBookEntry>;
    async fn delete(&self, student_id: &str, exercise_id: &str) -> AppResult<()>;
}

pub struct MongoErrorBookRepository {
    collection: Collection<ErrorBookEntry>,
}

impl MongoErrorBookRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(collections::ERROR_BOOK);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let student_exercise_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "exercise_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("student_exercise_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(student_exercise_index).await?;
        log::info!("Created indexes for error_book collection");
        Ok(())
    }
}

#[async_trait]
impl ErrorBookRepository for MongoErrorBookRepository {
    async fn record_miss(
        &self,
        student_id: &str,
        exercise_id: &str,
        unit_id: &str,
        answer: &Value,
    ) -> AppResult<ErrorBookEntry> {
        let now = timestamp::format(&Utc::now());
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let entry = self
            .collection
            .find_one_and_update(
                doc! { "student_id": student_id, "exercise_id": exercise_id },
                doc! {
                    "$inc": { "wrong_count": 1 },
                    "$set": {
                        "last_answer": to_bson(answer)?,
                        "last_wrong_at": now.clone(),
                        "mastered": false,
                    },
                    "$unset": { "mastered_at": "" },
                    "$setOnInsert": {
                        "id": Uuid::new_v4().to_string(),
                        "unit_id": unit_id,
                        "first_wrong_at": now,
                    },
                },
            )
            .with_options(options)
            .await?;

        entry.ok_or_else(|| {
            AppError::InternalError(format!(
                "error book upsert returned nothing for exercise '{}'",
                exercise_id
            ))
        })
    }

    async fn find(&self, student_id: &str, exercise_id: &str) -> AppResult<Option<ErrorBookEntry>> {
        let entry = self
            .collection
            .find_one(doc! { "student_id": student_id, "exercise_id": exercise_id })
            .await?;
        Ok(entry)
    }

    async fn list_by_student(
        &self,
        student_id: &str,
        include_mastered: bool,
    ) -> AppResult<Vec<ErrorBookEntry>> {
        let mut filter = doc! { "student_id": student_id };
        if !include_mastered {
            filter.insert("mastered", false);
        }

        let entries = self
            .collection
            .find(filter)
            .sort(doc! { "last_wrong_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(entries)
    }

    async fn mark_mastered(&self, student_id: &str, exercise_id: &str) -> AppResult<ErrorBookEntry> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection
            .find_one_and_update(
                doc! { "student_id": student_id, "exercise_id": exercise_id },
                doc! { "$set": { "mastered": true, "mastered_at": timestamp::format(&Utc::now()) } },
            )
            .with_options(options)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No error book entry for exercise '{}'", exercise_id))
            })
    }

    async fn delete(&self, student_id: &str, exercise_id: &str) -> AppResult<()> {
        let result = self
            .collection
            .delete_one(doc! { "student_id": student_id, "exercise_id": exercise_id })
            .await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "No error book entry for exercise '{}'",
                exercise_id
            )));
        }
        Ok(())
    }
}
