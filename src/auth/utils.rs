use async_graphql::Context;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
};

pub fn require_admin(claims: &Claims) -> AppResult<()> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can perform this action".to_string(),
        ));
    }
    Ok(())
}

pub fn require_self_or_admin(claims: &Claims, user_id: &str) -> AppResult<()> {
    if !claims.is_admin() && claims.sub != user_id {
        return Err(AppError::Forbidden(
            "You can only access your own records".to_string(),
        ));
    }
    Ok(())
}

/// The student a request acts on: the caller unless an admin names someone else.
pub fn resolve_student_id(claims: &Claims, requested: Option<String>) -> AppResult<String> {
    match requested {
        Some(student_id) => {
            require_self_or_admin(claims, &student_id)?;
            Ok(student_id)
        }
        None => Ok(claims.sub.clone()),
    }
}

pub fn extract_claims_from_context(ctx: &Context<'_>) -> AppResult<Claims> {
    ctx.data::<Claims>()
        .cloned()
        .map_err(|_| AppError::Unauthorized("Authentication required".to_string()))
}
