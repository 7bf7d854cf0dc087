use crate::config::stage::Stage;
use crm::{
    domain::value_objects::enums::followup_modes::FollowupMode,
    notifications::{resend_client::ResendConfig, twilio_client::TwilioConfig},
};

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub worker_server: WorkerServer,
    pub database: Database,
    pub resend: ResendConfig,
    pub twilio: TwilioConfig,
    pub reminders: Reminders,
    pub stage: Stage,
}

#[derive(Debug, Clone)]
pub struct WorkerServer {
    pub port: u16,
    /// Seconds.
    pub timeout: u64,
    /// MiB.
    pub body_limit: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Reminders {
    pub trigger_token: Option<String>,
    pub schedule_interval_secs: Option<u64>,
    pub renewal_lead_days: u64,
    pub renewal_followup_mode: FollowupMode,
}
