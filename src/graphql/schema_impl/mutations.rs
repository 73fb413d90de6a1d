use async_graphql::{Context, Json, Object};
use serde_json::Value;

use crate::{
    app_state::AppState,
    graphql::helpers::{gql, require_claims},
    models::{
        domain::UnitProgress,
        dto::{request::SubmitAnswerRequest, response::SubmissionOutcome},
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn submit_answer(
        &self,
        ctx: &Context<'_>,
        exercise_id: String,
        answer: Json<Value>,
        response_time_ms: Option<i64>,
    ) -> async_graphql::Result<SubmissionOutcome> {
        let state = ctx.data::<AppState>()?;
        let claims = require_claims(ctx)?;

        let request = SubmitAnswerRequest {
            answer: answer.0,
            response_time_ms,
        };
        gql(state
            .answer_service
            .submit(&claims.sub, &exercise_id, request)
            .await)
    }

    async fn study_course(
        &self,
        ctx: &Context<'_>,
        course_id: String,
    ) -> async_graphql::Result<UnitProgress> {
        let state = ctx.data::<AppState>()?;
        let claims = require_claims(ctx)?;

        gql(state
            .progress_service
            .mark_course_studied(&claims.sub, &course_id)
            .await)
    }
}
