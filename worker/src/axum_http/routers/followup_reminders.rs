use std::sync::Arc;

use axum::{Json, Router, extract::State, http::HeaderMap, routing::post};
use chrono::Utc;
use crm::domain::value_objects::followups::ReminderRunReport;

use crate::{
    axum_http::{error_responses::TriggerError, trigger_auth::authorize_trigger},
    usecases::send_followup_reminders::SendFollowupRemindersUseCase,
};

// Run example
//   curl -X POST "http://localhost:$SERVER_PORT_WORKER/functions/v1/send-followup-reminders" \
//     -H "Authorization: Bearer $REMINDER_TRIGGER_TOKEN"

#[derive(Clone)]
pub struct FollowupReminderRouteState {
    pub usecase: Arc<SendFollowupRemindersUseCase>,
    pub trigger_token: Option<String>,
}

pub fn routes(state: FollowupReminderRouteState) -> Router {
    Router::new()
        .route("/send-followup-reminders", post(send_followup_reminders))
        .with_state(state)
}

/// The request body is ignored.
pub async fn send_followup_reminders(
    State(state): State<FollowupReminderRouteState>,
    headers: HeaderMap,
) -> Result<Json<ReminderRunReport>, TriggerError> {
    authorize_trigger(&headers, state.trigger_token.as_deref())?;

    let report = state.usecase.run(Utc::now().date_naive()).await?;
    Ok(Json(report))
}
