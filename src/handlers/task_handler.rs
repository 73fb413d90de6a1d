use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_admin, AuthenticatedUser},
    errors::AppError,
    models::dto::{
        request::{CreateTaskRequest, TaskQuery},
        response::MessageResponse,
    },
};

#[get("/tasks")]
pub async fn list_tasks(
    state: web::Data<AppState>,
    query: web::Query<TaskQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();

    let tasks = state
        .task_service
        .list_tasks(&auth.0, query.student_id, query.status)
        .await?;
    Ok(HttpResponse::Ok().json(tasks))
}

#[post("/tasks")]
pub async fn create_task(
    state: web::Data<AppState>,
    request: web::Json<CreateTaskRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let task = state
        .task_service
        .create_task(request.into_inner(), auth.user_id())
        .await?;
    Ok(HttpResponse::Created().json(task))
}

#[post("/tasks/{id}/complete")]
pub async fn complete_task(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let task = state.task_service.complete_task(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(task))
}

#[delete("/tasks/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    state.task_service.delete_task(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Task deleted")))
}
