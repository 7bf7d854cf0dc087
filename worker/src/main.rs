use anyhow::Result;
use crm::domain::repositories::{
    followup_reminders::FollowupReminderRepository,
    notifications::{EmailGateway, WhatsAppGateway},
    renewal_followups::RenewalFollowupRepository,
};
use crm::infra::db::{
    postgres::postgres_connection,
    repositories::{
        followup_reminders::FollowupReminderPostgres, renewal_followups::RenewalFollowupPostgres,
    },
};
use crm::notifications::{resend_client::ResendClient, twilio_client::TwilioClient};
use reminder_worker::{
    axum_http, config,
    services::reminder_schedule,
    usecases::{
        generate_renewal_followups::{GenerateRenewalFollowupsUseCase, RenewalFollowupSettings},
        send_followup_reminders::{ReminderChannels, SendFollowupRemindersUseCase},
    },
};
use std::{sync::Arc, time::Duration};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(error) = run().await {
        // Config and subscriber failures happen before any log output exists.
        if tracing::dispatcher::has_been_set() {
            error!("Reminder worker exited with error: {:#}", error);
        } else {
            eprintln!("Reminder worker exited with error: {error:#}");
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    // Loads `.env` first so the observability settings can see it too.
    let dotenvy_env = Arc::new(config::config_loader::load()?);
    crm::observability::init_observability("reminder-worker")?;
    info!(stage = %dotenvy_env.stage, "ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let db_pool_arc = Arc::new(postgres_pool);

    let followup_repository: Arc<dyn FollowupReminderRepository + Send + Sync> =
        Arc::new(FollowupReminderPostgres::new(Arc::clone(&db_pool_arc)));
    let renewal_repository: Arc<dyn RenewalFollowupRepository + Send + Sync> =
        Arc::new(RenewalFollowupPostgres::new(Arc::clone(&db_pool_arc)));

    // Missing provider credentials degrade the channel instead of failing startup.
    let email_gateway: Option<Arc<dyn EmailGateway + Send + Sync>> =
        match ResendClient::from_config(&dotenvy_env.resend)? {
            Some(client) => Some(Arc::new(client)),
            None => {
                warn!("RESEND_API_KEY is not set; email reminders will fail");
                None
            }
        };
    let whatsapp_gateway: Option<Arc<dyn WhatsAppGateway + Send + Sync>> =
        match TwilioClient::from_config(&dotenvy_env.twilio)? {
            Some(client) => Some(Arc::new(client)),
            None => {
                warn!("Twilio credentials are incomplete; WhatsApp reminders will fail");
                None
            }
        };

    let reminders_usecase = Arc::new(SendFollowupRemindersUseCase::new(
        followup_repository,
        email_gateway,
        whatsapp_gateway,
        ReminderChannels {
            email_from: dotenvy_env.resend.from.clone(),
            whatsapp_country_code: dotenvy_env.twilio.country_code.clone(),
        },
    ));

    let renewals_usecase = Arc::new(GenerateRenewalFollowupsUseCase::new(
        renewal_repository,
        RenewalFollowupSettings {
            lead_days: dotenvy_env.reminders.renewal_lead_days,
            followup_mode: dotenvy_env.reminders.renewal_followup_mode.clone(),
        },
    ));

    let server_config = Arc::clone(&dotenvy_env);
    let server_reminders = Arc::clone(&reminders_usecase);
    let http_server = tokio::spawn(async move {
        axum_http::http_serve::start(server_config, server_reminders, renewals_usecase).await
    });

    match dotenvy_env.reminders.schedule_interval_secs {
        Some(interval_secs) => {
            let schedule = tokio::spawn(reminder_schedule::run_reminder_schedule(
                reminders_usecase,
                Duration::from_secs(interval_secs),
            ));

            tokio::select! {
                result = http_server => result??,
                result = schedule => result??,
            };
        }
        None => http_server.await??,
    }

    Ok(())
}
