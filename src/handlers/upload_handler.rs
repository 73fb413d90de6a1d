use actix_web::{
    get,
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    post, web, HttpRequest, HttpResponse,
};
use futures::StreamExt;

use crate::{
    app_state::AppState,
    auth::{require_admin, AuthenticatedUser},
    errors::AppError,
};

/// Raw-body media upload. The body is read incrementally so oversized uploads
/// are refused before they are fully buffered.
#[post("/uploads")]
pub async fn upload(
    state: web::Data<AppState>,
    req: HttpRequest,
    mut payload: web::Payload,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let limit = state.upload_service.max_bytes();

    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk
            .map_err(|e| AppError::ValidationError(format!("Failed to read upload: {}", e)))?;
        if body.len() + chunk.len() > limit {
            return Err(AppError::ValidationError(format!(
                "Upload exceeds the {} byte limit",
                limit
            )));
        }
        body.extend_from_slice(&chunk);
    }

    let response = state.upload_service.store(&content_type, &body).await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("/uploads/{name}")]
pub async fn serve_upload(
    state: web::Data<AppState>,
    name: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let (bytes, content_type) = state.upload_service.read(&name).await?;

    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((CACHE_CONTROL, "public, max-age=31536000, immutable"))
        .body(bytes))
}
