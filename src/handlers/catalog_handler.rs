use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_admin, AuthenticatedUser},
    errors::AppError,
    models::dto::{
        request::{
            CreateCourseRequest, CreateUnitRequest, SubjectRequest, UpdateCourseRequest,
            UpdateUnitRequest,
        },
        response::MessageResponse,
    },
};

#[get("/subjects")]
pub async fn list_subjects(
    state: web::Data<AppState>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let subjects = state.catalog_service.list_subjects().await?;
    Ok(HttpResponse::Ok().json(subjects))
}

#[get("/subjects/{id}")]
pub async fn get_subject(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let subject = state.catalog_service.get_subject(&id).await?;
    Ok(HttpResponse::Ok().json(subject))
}

#[post("/subjects")]
pub async fn create_subject(
    state: web::Data<AppState>,
    request: web::Json<SubjectRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let subject = state
        .catalog_service
        .create_subject(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(subject))
}

#[put("/subjects/{id}")]
pub async fn update_subject(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubjectRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let subject = state
        .catalog_service
        .update_subject(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(subject))
}

#[delete("/subjects/{id}")]
pub async fn delete_subject(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    state.catalog_service.delete_subject(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Subject deleted")))
}

#[get("/subjects/{id}/units")]
pub async fn list_units(
    state: web::Data<AppState>,
    subject_id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let units = state.catalog_service.list_units(&subject_id).await?;
    Ok(HttpResponse::Ok().json(units))
}

#[get("/units/{id}")]
pub async fn get_unit(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let unit = state.catalog_service.get_unit(&id).await?;
    Ok(HttpResponse::Ok().json(unit))
}

#[post("/units")]
pub async fn create_unit(
    state: web::Data<AppState>,
    request: web::Json<CreateUnitRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let unit = state.catalog_service.create_unit(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(unit))
}

#[put("/units/{id}")]
pub async fn update_unit(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateUnitRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let unit = state
        .catalog_service
        .update_unit(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(unit))
}

#[delete("/units/{id}")]
pub async fn delete_unit(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    state.catalog_service.delete_unit(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Unit deleted")))
}

#[get("/units/{id}/courses")]
pub async fn list_courses(
    state: web::Data<AppState>,
    unit_id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let courses = state.catalog_service.list_courses(&unit_id).await?;
    Ok(HttpResponse::Ok().json(courses))
}

#[get("/courses/{id}")]
pub async fn get_course(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let course = state.catalog_service.get_course(&id).await?;
    Ok(HttpResponse::Ok().json(course))
}

#[post("/courses")]
pub async fn create_course(
    state: web::Data<AppState>,
    request: web::Json<CreateCourseRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let course = state
        .catalog_service
        .create_course(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(course))
}

#[put("/courses/{id}")]
pub async fn update_course(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateCourseRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let course = state
        .catalog_service
        .update_course(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(course))
}

#[delete("/courses/{id}")]
pub async fn delete_course(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    state.catalog_service.delete_course(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Course deleted")))
}

/// Record that the caller went through a course; returns the updated unit progress.
#[post("/courses/{id}/study")]
pub async fn study_course(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let progress = state
        .progress_service
        .mark_course_studied(auth.user_id(), &id)
        .await?;
    Ok(HttpResponse::Ok().json(progress))
}
