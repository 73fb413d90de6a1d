use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    auth::{require_self_or_admin, Claims},
    errors::{AppError, AppResult},
    models::{
        domain::{StudyTask, TaskStatus, UserRole},
        dto::request::CreateTaskRequest,
    },
    repositories::{StudyTaskRepository, UnitRepository, UserRepository},
};

pub struct TaskService {
    repository: Arc<dyn StudyTaskRepository>,
    users: Arc<dyn UserRepository>,
    units: Arc<dyn UnitRepository>,
}

impl TaskService {
    pub fn new(
        repository: Arc<dyn StudyTaskRepository>,
        users: Arc<dyn UserRepository>,
        units: Arc<dyn UnitRepository>,
    ) -> Self {
        Self {
            repository,
            users,
            units,
        }
    }

    pub async fn create_task(&self, request: CreateTaskRequest, created_by: &str) -> AppResult<StudyTask> {
        request.validate()?;

        let student = self
            .users
            .find_by_id(&request.student_id)
            .await?
            .filter(|user| user.role == UserRole::Student)
            .ok_or_else(|| {
                AppError::NotFound(format!("Student with id '{}' not found", request.student_id))
            })?;
        let unit = self
            .units
            .find_by_id(&request.unit_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Unit with id '{}' not found", request.unit_id)))?;

        let mut task = StudyTask::new(&student.id, &unit.id, &request.title, created_by);
        task.note = request.note;
        task.due_at = request.due_at;

        self.repository.create(task).await
    }

    pub async fn get_task(&self, id: &str) -> AppResult<StudyTask> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task with id '{}' not found", id)))
    }

    /// Students always see their own tasks. Admins see one student's or everyone's.
    pub async fn list_tasks(
        &self,
        claims: &Claims,
        student_id: Option<String>,
        status: Option<TaskStatus>,
    ) -> AppResult<Vec<StudyTask>> {
        let student_id = match claims.role {
            UserRole::Admin => student_id,
            UserRole::Student => Some(claims.sub.clone()),
        };
        self.repository.list(student_id, status).await
    }

    pub async fn complete_task(&self, claims: &Claims, id: &str) -> AppResult<StudyTask> {
        let mut task = self.get_task(id).await?;
        require_self_or_admin(claims, &task.student_id)?;

        if task.status == TaskStatus::Done {
            return Ok(task);
        }
        task.status = TaskStatus::Done;
        task.completed_at = Some(Utc::now());

        self.repository.update(task).await
    }

    pub async fn delete_task(&self, id: &str) -> AppResult<()> {
        self.repository.delete(id).await
    }

    pub async fn close_for_unit(&self, student_id: &str, unit_id: &str) -> AppResult<u64> {
        let closed = self.repository.close_open_for_unit(student_id, unit_id).await?;
        if closed > 0 {
            log::info!(
                "closed {} task(s) for student {} after completing unit {}",
                closed,
                student_id,
                unit_id
            );
        }
        Ok(closed)
    }
}
