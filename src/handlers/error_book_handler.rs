use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{resolve_student_id, AuthenticatedUser},
    errors::AppError,
    models::dto::{
        request::{ErrorBookQuery, StudentScopeQuery},
        response::MessageResponse,
    },
};

#[get("/error-book")]
pub async fn list_error_book(
    state: web::Data<AppState>,
    query: web::Query<ErrorBookQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let student_id = resolve_student_id(&auth.0, query.student_id)?;

    let items = state
        .error_book_service
        .list_with_exercises(&student_id, query.include_mastered.unwrap_or(false))
        .await?;
    Ok(HttpResponse::Ok().json(items))
}

#[post("/error-book/{exercise_id}/mastered")]
pub async fn mark_mastered(
    state: web::Data<AppState>,
    exercise_id: web::Path<String>,
    query: web::Query<StudentScopeQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let student_id = resolve_student_id(&auth.0, query.into_inner().student_id)?;

    let entry = state
        .error_book_service
        .mark_mastered(&student_id, &exercise_id)
        .await?;
    Ok(HttpResponse::Ok().json(entry))
}

#[delete("/error-book/{exercise_id}")]
pub async fn remove_entry(
    state: web::Data<AppState>,
    exercise_id: web::Path<String>,
    query: web::Query<StudentScopeQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let student_id = resolve_student_id(&auth.0, query.into_inner().student_id)?;

    state
        .error_book_service
        .remove(&student_id, &exercise_id)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Error book entry removed")))
}
