use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::Course,
};

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create(&self, course: Course) -> AppResult<Course>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Course>>;
    async fn list_by_unit(&self, unit_id: &str) -> AppResult<Vec<Course>>;
    async fn update(&self, course: Course) -> AppResult<Course>;
    async fn delete(&self, id: &str) -> AppResult<()>;
}

pub struct MongoCourseRepository {
    collection: Collection<Course>,
}

impl MongoCourseRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(collections::COURSES);
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

        let unit_index = IndexModel::builder()
            .keys(doc! { "unit_id": 1, "order": 1 })
            .options(IndexOptions::builder().name("unit_order".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(unit_index).await?;
        log::info!("Created indexes for courses collection");
        Ok(())
    }
}

#[async_trait]
impl CourseRepository for MongoCourseRepository {
    async fn create(&self, course: Course) -> AppResult<Course> {
        self.collection.insert_one(&course).await?;
        Ok(course)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Course>> {
        let course = self.collection.find_one(doc! { "id": id }).await?;
        Ok(course)
    }

    async fn list_by_unit(&self, unit_id: &str) -> AppResult<Vec<Course>> {
        let courses = self
            .collection
            .find(doc! { "unit_id": unit_id })
            .sort(doc! { "order": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(courses)
    }

    async fn update(&self, course: Course) -> AppResult<Course> {
        let result = self
            .collection
            .replace_one(doc! { "id": &course.id }, &course)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Course '{}' not found", course.id)));
        }
        Ok(course)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Course '{}' not found", id)));
        }
        Ok(())
    }
}
