use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{User, UserRole},
        dto::{
            request::{PaginationParams, UpdateStudentRequest},
            response::{PaginatedResponse, UserDto},
        },
    },
    repositories::{RefreshTokenRepository, UserRepository},
};

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
    ) -> Self {
        Self {
            repository,
            refresh_tokens,
        }
    }

    pub async fn get_user(&self, id: &str) -> AppResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))
    }

    pub async fn get_student(&self, id: &str) -> AppResult<User> {
        let user = self.get_user(id).await?;
        if user.role != UserRole::Student {
            return Err(AppError::NotFound(format!("Student with id '{}' not found", id)));
        }
        Ok(user)
    }

    pub async fn list_students(
        &self,
        pagination: &PaginationParams,
    ) -> AppResult<PaginatedResponse<UserDto>> {
        pagination.validate()?;
        let (offset, limit) = (pagination.offset(), pagination.limit());

        let (users, total) = self
            .repository
            .list_by_role(UserRole::Student, offset, limit)
            .await?;

        Ok(PaginatedResponse {
            items: users.into_iter().map(UserDto::from).collect(),
            total,
            offset,
            limit,
        })
    }

    pub async fn update_student(&self, id: &str, request: UpdateStudentRequest) -> AppResult<User> {
        request.validate()?;

        let mut user = self.get_student(id).await?;
        if let Some(display_name) = request.display_name {
            user.display_name = display_name;
        }
        if let Some(email) = request.email {
            user.email = Some(email);
        }
        if let Some(grade) = request.grade {
            user.grade = Some(grade);
        }
        user.modified_at = Some(Utc::now());

        self.repository.update(user).await
    }

    pub async fn delete_student(&self, id: &str) -> AppResult<()> {
        let student = self.get_student(id).await?;
        self.refresh_tokens.revoke_all_for_user(&student.id).await?;
        self.repository.delete(&student.id).await?;

        log::info!("deleted student {}", student.username);
        Ok(())
    }
}
