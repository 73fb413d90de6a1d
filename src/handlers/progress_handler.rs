use actix_web::{get, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{resolve_student_id, AuthenticatedUser},
    errors::AppError,
    models::dto::request::{AnswerHistoryQuery, StudentScopeQuery},
};

#[get("/progress")]
pub async fn list_progress(
    state: web::Data<AppState>,
    query: web::Query<StudentScopeQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let student_id = resolve_student_id(&auth.0, query.into_inner().student_id)?;

    let progress = state.progress_service.list_for_student(&student_id).await?;
    Ok(HttpResponse::Ok().json(progress))
}

#[get("/progress/{unit_id}")]
pub async fn get_unit_progress(
    state: web::Data<AppState>,
    unit_id: web::Path<String>,
    query: web::Query<StudentScopeQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let student_id = resolve_student_id(&auth.0, query.into_inner().student_id)?;
    let unit = state.catalog_service.get_unit(&unit_id).await?;

    let progress = state
        .progress_service
        .get_unit_progress(&student_id, &unit.id)
        .await?;
    Ok(HttpResponse::Ok().json(progress))
}

#[get("/answers")]
pub async fn answer_history(
    state: web::Data<AppState>,
    query: web::Query<AnswerHistoryQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let pagination = query.pagination();
    let student_id = resolve_student_id(&auth.0, query.student_id)?;

    let page = state
        .answer_service
        .history(&student_id, query.unit_id, &pagination)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}
