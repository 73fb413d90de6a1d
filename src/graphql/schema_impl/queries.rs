use async_graphql::{Context, Object};

use crate::{
    app_state::AppState,
    graphql::helpers::{gql, require_claims},
    models::{
        domain::{ErrorBookEntry, Subject, Unit, UnitProgress},
        dto::response::{ExerciseView, UserDto},
    },
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<UserDto> {
        let state = ctx.data::<AppState>()?;
        let claims = require_claims(ctx)?;

        gql(state.user_service.get_user(&claims.sub).await).map(UserDto::from)
    }

    async fn subjects(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Subject>> {
        let state = ctx.data::<AppState>()?;
        require_claims(ctx)?;

        gql(state.catalog_service.list_subjects().await)
    }

    async fn units(
        &self,
        ctx: &Context<'_>,
        subject_id: String,
    ) -> async_graphql::Result<Vec<Unit>> {
        let state = ctx.data::<AppState>()?;
        require_claims(ctx)?;

        gql(state.catalog_service.list_units(&subject_id).await)
    }

    /// Exercises of a unit without their answer keys.
    async fn exercises(
        &self,
        ctx: &Context<'_>,
        unit_id: String,
    ) -> async_graphql::Result<Vec<ExerciseView>> {
        let state = ctx.data::<AppState>()?;
        require_claims(ctx)?;

        gql(state.exercise_service.list_views(&unit_id).await)
    }

    async fn my_progress(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<UnitProgress>> {
        let state = ctx.data::<AppState>()?;
        let claims = require_claims(ctx)?;

        gql(state.progress_service.list_for_student(&claims.sub).await)
    }

    async fn error_book(
        &self,
        ctx: &Context<'_>,
        include_mastered: Option<bool>,
    ) -> async_graphql::Result<Vec<ErrorBookEntry>> {
        let state = ctx.data::<AppState>()?;
        let claims = require_claims(ctx)?;

        gql(state
            .error_book_service
            .list_entries(&claims.sub, include_mastered.unwrap_or(false))
            .await)
    }
}
