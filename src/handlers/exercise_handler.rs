use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_admin, AuthenticatedUser},
    errors::AppError,
    middleware::get_request_id,
    models::dto::{
        request::{CreateExerciseRequest, SubmitAnswerRequest, UpdateExerciseRequest},
        response::MessageResponse,
    },
};

/// Admins get the answer key; students get the view without it.
#[get("/units/{id}/exercises")]
pub async fn list_exercises(
    state: web::Data<AppState>,
    unit_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    if auth.0.is_admin() {
        let exercises = state.exercise_service.list_full(&unit_id).await?;
        return Ok(HttpResponse::Ok().json(exercises));
    }

    let views = state.exercise_service.list_views(&unit_id).await?;
    Ok(HttpResponse::Ok().json(views))
}

#[get("/exercises/{id}")]
pub async fn get_exercise(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    if auth.0.is_admin() {
        let exercise = state.exercise_service.get_exercise(&id).await?;
        return Ok(HttpResponse::Ok().json(exercise));
    }

    let view = state.exercise_service.get_view(&id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/exercises")]
pub async fn create_exercise(
    state: web::Data<AppState>,
    request: web::Json<CreateExerciseRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let exercise = state
        .exercise_service
        .create_exercise(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(exercise))
}

#[put("/exercises/{id}")]
pub async fn update_exercise(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateExerciseRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let exercise = state
        .exercise_service
        .update_exercise(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(exercise))
}

#[delete("/exercises/{id}")]
pub async fn delete_exercise(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    state.exercise_service.delete_exercise(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Exercise deleted")))
}

#[post("/exercises/{id}/answers")]
pub async fn submit_answer(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitAnswerRequest>,
    auth: AuthenticatedUser,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    log::debug!(
        "[{}] submission from {} for exercise {}",
        get_request_id(&req).unwrap_or_default(),
        auth.user_id(),
        id
    );
    let outcome = state
        .answer_service
        .submit(auth.user_id(), &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(outcome))
}
