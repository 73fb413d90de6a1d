use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::{timestamp, StudyTask, TaskStatus},
};

#[async_trait]
pub trait StudyTaskRepository: Send + Sync {
    async fn create(&self, task: StudyTask) -> AppResult<StudyTask>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<StudyTask>>;
    async fn list(
        &self,
        student_id: Option<String>,
        status: Option<TaskStatus>,
    ) -> AppResult<Vec<StudyTask>>;
    async fn update(&self, task: StudyTask) -> AppResult<StudyTask>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    /// Mark every open task for the unit done. Returns how many were closed.
    async fn close_open_for_unit(&self, student_id: &str, unit_id: &str) -> AppResult<u64>;
}

pub struct MongoStudyTaskRepository {
    collection: Collection<StudyTask>,
}

impl MongoStudyTaskRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(collections::STUDY_TASKS);
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

        let student_unit_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "unit_id": 1, "status": 1 })
            .options(
                IndexOptions::builder()
                    .name("student_unit_status".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(student_unit_index).await?;
        log::info!("Created indexes for study_tasks collection");
        Ok(())
    }
}

#[async_trait]
impl StudyTaskRepository for MongoStudyTaskRepository {
    async fn create(&self, task: StudyTask) -> AppResult<StudyTask> {
        self.collection.insert_one(&task).await?;
        Ok(task)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<StudyTask>> {
        let task = self.collection.find_one(doc! { "id": id }).await?;
        Ok(task)
    }

    async fn list(
        &self,
        student_id: Option<String>,
        status: Option<TaskStatus>,
    ) -> AppResult<Vec<StudyTask>> {
        let mut filter = doc! {};
        if let Some(sid) = student_id {
            filter.insert("student_id", sid);
        }
        if let Some(status) = status {
            filter.insert("status", status.as_str());
        }

        let tasks = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(tasks)
    }

    async fn update(&self, task: StudyTask) -> AppResult<StudyTask> {
        let result = self
            .collection
            .replace_one(doc! { "id": &task.id }, &task)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Task '{}' not found", task.id)));
        }
        Ok(task)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Task '{}' not found", id)));
        }
        Ok(())
    }

    async fn close_open_for_unit(&self, student_id: &str, unit_id: &str) -> AppResult<u64> {
        let result = self
            .collection
            .update_many(
                doc! {
                    "student_id": student_id,
                    "unit_id": unit_id,
                    "status": TaskStatus::Open.as_str(),
                },
                doc! {
                    "$set": {
                        "status": TaskStatus::Done.as_str(),
                        "completed_at": timestamp::format(&Utc::now()),
                    }
                },
            )
            .await?;

        Ok(result.modified_count)
    }
}
