use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::{IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::{User, UserRole},
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> AppResult<User>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn list_by_role(
        &self,
        role: UserRole,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<User>, i64)>;
    async fn update(&self, user: User) -> AppResult<User>;
    async fn add_points(&self, id: &str, points: i64) -> AppResult<()>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(collections::USERS);
        Self { collection }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        if self.find_by_username(&user.username).await?.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "User with username '{}' already exists",
                user.username
            )));
        }

        self.collection.insert_one(&user).await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "id": id }).await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "username": username })
            .await?;
        Ok(user)
    }

    async fn list_by_role(
        &self,
        role: UserRole,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<User>, i64)> {
        let filter = doc! { "role": to_bson(&role)? };

        let total = self.collection.count_documents(filter.clone()).await? as i64;

        let users = self
            .collection
            .find(filter)
            .skip(offset.max(0) as u64)
            .limit(limit)
            .sort(doc! { "username": 1 })
            .await?
            .try_collect()
            .await?;

        Ok((users, total))
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let options = ReplaceOptions::builder().upsert(false).build();

        let result = self
            .collection
            .replace_one(doc! { "id": &user.id }, &user)
            .with_options(options)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("User '{}' not found", user.id)));
        }

        Ok(user)
    }

    async fn add_points(&self, id: &str, points: i64) -> AppResult<()> {
        let result = self
            .collection
            .update_one(doc! { "id": id }, doc! { "$inc": { "points": points } })
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("User '{}' not found", id)));
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("User '{}' not found", id)));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let id_model = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let username_model = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection.create_index(id_model).await?;
        self.collection.create_index(username_model).await?;
        log::info!("Created unique indexes on users.id and users.username");

        Ok(())
    }
}
