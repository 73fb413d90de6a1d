use actix_web::{web, HttpRequest, HttpResponse};
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::{app_state::AppState, auth::bearer_claims, graphql::Schema};

/// Execute a GraphQL request. A valid bearer token becomes `Claims` in the request data;
/// resolvers that need a user fail without it.
pub async fn graphql(
    schema: web::Data<Schema>,
    state: web::Data<AppState>,
    http_request: HttpRequest,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = request.into_inner();
    if let Some(claims) = bearer_claims(&http_request, &state.jwt_service) {
        request = request.data(claims);
    }

    schema.execute(request).await.into()
}

pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}
