use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::Subject,
};

#[async_trait]
pub trait SubjectRepository: Send + Sync {
    async fn create(&self, subject: Subject) -> AppResult<Subject>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Subject>>;
    async fn list_all(&self) -> AppResult<Vec<Subject>>;
    async fn update(&self, subject: Subject) -> AppResult<Subject>;
    async fn delete(&self, id: &str) -> AppResult<()>;
}

pub struct MongoSubjectRepository {
    collection: Collection<Subject>,
}

impl MongoSubjectRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(collections::SUBJECTS);
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

        self.collection.create_index(id_index).await?;
        log::info!("Created indexes for subjects collection");
        Ok(())
    }
}

#[async_trait]
impl SubjectRepository for MongoSubjectRepository {
    async fn create(&self, subject: Subject) -> AppResult<Subject> {
        self.collection.insert_one(&subject).await?;
        Ok(subject)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Subject>> {
        let subject = self.collection.find_one(doc! { "id": id }).await?;
        Ok(subject)
    }

    async fn list_all(&self) -> AppResult<Vec<Subject>> {
        let subjects = self
            .collection
            .find(doc! {})
            .sort(doc! { "order": 1, "name": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(subjects)
    }

    async fn update(&self, subject: Subject) -> AppResult<Subject> {
        let result = self
            .collection
            .replace_one(doc! { "id": &subject.id }, &subject)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Subject '{}' not found", subject.id)));
        }
        Ok(subject)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Subject '{}' not found", id)));
        }
        Ok(())
    }
}
