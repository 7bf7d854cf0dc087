use crate::usecases::send_followup_reminders::SendFollowupRemindersUseCase;
use anyhow::Result;
use chrono::Utc;
use std::{sync::Arc, time::Duration};
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

/// Runs the reminder dispatch every `interval`, in-process. Failed runs are
/// logged and retried on the next tick.
pub async fn run_reminder_schedule(
    usecase: Arc<SendFollowupRemindersUseCase>,
    interval: Duration,
) -> Result<()> {
    info!(interval_secs = interval.as_secs(), "reminder schedule started");

    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match usecase.run(Utc::now().date_naive()).await {
            Ok(report) => info!(message = %report.message, "scheduled reminder run finished"),
            Err(err) => error!(error = ?err, "scheduled reminder run failed"),
        }
    }
}
