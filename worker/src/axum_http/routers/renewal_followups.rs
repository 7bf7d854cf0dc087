use std::sync::Arc;

use axum::{Json, Router, extract::State, http::HeaderMap, routing::post};
use chrono::Utc;

use crate::{
    axum_http::{error_responses::TriggerError, trigger_auth::authorize_trigger},
    usecases::generate_renewal_followups::{
        GenerateRenewalFollowupsUseCase, RenewalGenerationReport,
    },
};

#[derive(Clone)]
pub struct RenewalFollowupRouteState {
    pub usecase: Arc<GenerateRenewalFollowupsUseCase>,
    pub trigger_token: Option<String>,
}

pub fn routes(state: RenewalFollowupRouteState) -> Router {
    Router::new()
        .route("/generate-renewal-followups", post(generate_renewal_followups))
        .with_state(state)
}

pub async fn generate_renewal_followups(
    State(state): State<RenewalFollowupRouteState>,
    headers: HeaderMap,
) -> Result<Json<RenewalGenerationReport>, TriggerError> {
    authorize_trigger(&headers, state.trigger_token.as_deref())?;

    let report = state.usecase.run(Utc::now().date_naive()).await?;
    Ok(Json(report))
}
