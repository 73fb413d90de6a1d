use async_graphql::{Context, ErrorExtensions};

use crate::{
    auth::{extract_claims_from_context, Claims},
    errors::AppResult,
};

/// Convert a service result into a GraphQL result that keeps the error `code`.
pub fn gql<T>(result: AppResult<T>) -> async_graphql::Result<T> {
    result.map_err(|e| e.extend())
}

pub fn require_claims(ctx: &Context<'_>) -> async_graphql::Result<Claims> {
    gql(extract_claims_from_context(ctx))
}
