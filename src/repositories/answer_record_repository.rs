use async_trait::async_trait;
use futures::TryStreamExt;
#[cfg(test)]
use mockall::automock;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::AppResult,
    models::domain::AnswerRecord,
};

/// Answer records are append-only: there is no update or delete.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AnswerRecordRepository: Send + Sync {
    async fn create(&self, record: AnswerRecord) -> AppResult<AnswerRecord>;
    async fn count_for_exercise(&self, student_id: &str, exercise_id: &str) -> AppResult<u64>;
    async fn has_correct(&self, student_id: &str, exercise_id: &str) -> AppResult<bool>;
    async fn exists_for_exercise(&self, exercise_id: &str) -> AppResult<bool>;
    async fn list_by_student_and_unit(
        &self,
        student_id: &str,
        unit_id: &str,
    ) -> AppResult<Vec<AnswerRecord>>;
    async fn list_by_student(
        &self,
        student_id: &str,
        unit_id: Option<String>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<AnswerRecord>, i64)>;
}

pub struct MongoAnswerRecordRepository {
    collection: Collection<AnswerRecord>,
}

impl MongoAnswerRecordRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(collections::ANSWER_RECORDS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for answer_records collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let student_exercise_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "exercise_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("student_exercise".to_string())
                    .build(),
            )
            .build();

        let student_unit_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "unit_id": 1, "submitted_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("student_unit_submitted".to_string())
                    .build(),
            )
            .build();

        let exercise_index = IndexModel::builder()
            .keys(doc! { "exercise_id": 1 })
            .options(IndexOptions::builder().name("exercise_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(student_exercise_index).await?;
        self.collection.create_index(student_unit_index).await?;
        self.collection.create_index(exercise_index).await?;

        log::info!("Successfully created indexes for answer_records collection");
        Ok(())
    }
}

#[async_trait]
impl AnswerRecordRepository for MongoAnswerRecordRepository {
    async fn create(&self, record: AnswerRecord) -> AppResult<AnswerRecord> {
        self.collection.insert_one(&record).await?;
        Ok(record)
    }

    async fn count_for_exercise(&self, student_id: &str, exercise_id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! {
                "student_id": student_id,
                "exercise_id": exercise_id
            })
            .await?;
        Ok(count)
    }

    async fn has_correct(&self, student_id: &str, exercise_id: &str) -> AppResult<bool> {
        let record = self
            .collection
            .find_one(doc! {
                "student_id": student_id,
                "exercise_id": exercise_id,
                "is_correct": true
            })
            .await?;
        Ok(record.is_some())
    }

    async fn exists_for_exercise(&self, exercise_id: &str) -> AppResult<bool> {
        let record = self
            .collection
            .find_one(doc! { "exercise_id": exercise_id })
            .await?;
        Ok(record.is_some())
    }

    async fn list_by_student_and_unit(
        &self,
        student_id: &str,
        unit_id: &str,
    ) -> AppResult<Vec<AnswerRecord>> {
        let records = self
            .collection
            .find(doc! {
                "student_id": student_id,
                "unit_id": unit_id
            })
            .sort(doc! { "submitted_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(records)
    }

    async fn list_by_student(
        &self,
        student_id: &str,
        unit_id: Option<String>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<AnswerRecord>, i64)> {
        let mut filter = doc! { "student_id": student_id };

        if let Some(uid) = unit_id {
            filter.insert("unit_id", uid);
        }

        let total = self.collection.count_documents(filter.clone()).await?;

        let records = self
            .collection
            .find(filter)
            .skip(offset.max(0) as u64)
            .limit(limit)
            .sort(doc! { "submitted_at": -1 })
            .await?
            .try_collect()
            .await?;

        Ok((records, total as i64))
    }
}
