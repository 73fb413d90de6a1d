use actix_web::{delete, get, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_admin, require_self_or_admin, AuthenticatedUser},
    errors::AppError,
    models::dto::{
        request::{PaginationParams, UpdateStudentRequest},
        response::{MessageResponse, UserDto},
    },
};

#[get("/me")]
pub async fn me(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.get_user(auth.user_id()).await?;
    Ok(HttpResponse::Ok().json(UserDto::from(user)))
}

#[get("/students")]
pub async fn list_students(
    state: web::Data<AppState>,
    query: web::Query<PaginationParams>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let response = state.user_service.list_students(&query).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/students/{id}")]
pub async fn get_student(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_self_or_admin(&auth.0, &id)?;

    let student = state.user_service.get_student(&id).await?;
    Ok(HttpResponse::Ok().json(UserDto::from(student)))
}

#[put("/students/{id}")]
pub async fn update_student(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateStudentRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_self_or_admin(&auth.0, &id)?;

    let student = state
        .user_service
        .update_student(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(UserDto::from(student)))
}

#[delete("/students/{id}")]
pub async fn delete_student(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    state.user_service.delete_student(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!("Student '{}' deleted", id))))
}
