use super::config_model::{Database, DotEnvyConfig, Reminders, WorkerServer};
use crate::config::stage::Stage;
use anyhow::{Context, Result, bail};
use crm::{
    domain::value_objects::enums::followup_modes::FollowupMode,
    notifications::{
        resend_client::{DEFAULT_EMAIL_FROM, RESEND_API_BASE, ResendConfig},
        twilio_client::{DEFAULT_COUNTRY_CODE, TWILIO_API_BASE, TwilioConfig},
    },
};
use std::str::FromStr;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();
    load_from(|key| std::env::var(key).ok())
}

/// Builds the config from any key lookup; `load` feeds it the process env.
pub fn load_from<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let optional = |key: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let required = |key: &str| optional(key).with_context(|| format!("{key} is not set"));

    let worker_server = WorkerServer {
        port: required("SERVER_PORT_WORKER")?
            .parse()
            .context("SERVER_PORT_WORKER is invalid")?,
        body_limit: parse_or(optional("SERVER_BODY_LIMIT"), 1, "SERVER_BODY_LIMIT")?,
        timeout: parse_or(optional("SERVER_TIMEOUT"), 60, "SERVER_TIMEOUT")?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
    };

    let resend = ResendConfig {
        api_key: optional("RESEND_API_KEY"),
        from: optional("RESEND_FROM").unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string()),
        api_base: RESEND_API_BASE.to_string(),
    };

    let twilio = TwilioConfig {
        account_sid: optional("TWILIO_ACCOUNT_SID"),
        auth_token: optional("TWILIO_AUTH_TOKEN"),
        whatsapp_from: optional("TWILIO_WHATSAPP_FROM"),
        country_code: optional("WHATSAPP_COUNTRY_CODE")
            .unwrap_or_else(|| DEFAULT_COUNTRY_CODE.to_string()),
        api_base: TWILIO_API_BASE.to_string(),
    };

    let schedule_interval_secs = optional("REMINDER_SCHEDULE_INTERVAL_SECS")
        .map(|raw| raw.parse::<u64>())
        .transpose()
        .context("REMINDER_SCHEDULE_INTERVAL_SECS is invalid")?;
    if schedule_interval_secs == Some(0) {
        bail!("REMINDER_SCHEDULE_INTERVAL_SECS must be greater than zero");
    }

    let renewal_lead_days: u64 = parse_or(
        optional("RENEWAL_REMINDER_LEAD_DAYS"),
        7,
        "RENEWAL_REMINDER_LEAD_DAYS",
    )?;

    let renewal_followup_mode = match optional("RENEWAL_FOLLOWUP_MODE") {
        Some(raw) => FollowupMode::parse_known(&raw).context("RENEWAL_FOLLOWUP_MODE is invalid")?,
        None => FollowupMode::Whatsapp,
    };

    let reminders = Reminders {
        trigger_token: optional("REMINDER_TRIGGER_TOKEN"),
        schedule_interval_secs,
        renewal_lead_days,
        renewal_followup_mode,
    };

    let stage = optional("STAGE")
        .map(|raw| Stage::try_from(raw.as_str()))
        .transpose()?
        .unwrap_or_default();

    Ok(DotEnvyConfig {
        worker_server,
        database,
        resend,
        twilio,
        reminders,
        stage,
    })
}

fn parse_or<T>(raw: Option<String>, default: T, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw.parse().with_context(|| format!("{key} is invalid")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_with(vars: &[(&str, &str)]) -> Result<DotEnvyConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_from(|key| vars.get(key).cloned())
    }

    const MINIMAL: [(&str, &str); 2] = [
        ("SERVER_PORT_WORKER", "8090"),
        ("DATABASE_URL", "postgres://localhost/crm"),
    ];

    #[test]
    fn minimal_env_uses_defaults() {
        let config = load_with(&MINIMAL).unwrap();

        assert_eq!(config.worker_server.port, 8090);
        assert_eq!(config.worker_server.body_limit, 1);
        assert_eq!(config.worker_server.timeout, 60);
        assert_eq!(config.resend.from, DEFAULT_EMAIL_FROM);
        assert!(config.resend.api_key.is_none());
        assert!(config.twilio.credentials().is_none());
        assert_eq!(config.twilio.country_code, "+91");
        assert_eq!(config.reminders.renewal_lead_days, 7);
        assert_eq!(config.reminders.renewal_followup_mode, FollowupMode::Whatsapp);
        assert!(config.reminders.trigger_token.is_none());
        assert!(config.reminders.schedule_interval_secs.is_none());
        assert_eq!(config.stage, Stage::Local);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = load_with(&[("SERVER_PORT_WORKER", "8090")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn blank_optional_values_count_as_unset() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("RESEND_API_KEY", "  "));
        vars.push(("REMINDER_TRIGGER_TOKEN", ""));
        let config = load_with(&vars).unwrap();

        assert!(config.resend.api_key.is_none());
        assert!(config.reminders.trigger_token.is_none());
    }

    #[test]
    fn renewal_mode_must_be_a_known_channel() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("RENEWAL_FOLLOWUP_MODE", "sms"));
        assert!(load_with(&vars).is_err());

        let mut vars = MINIMAL.to_vec();
        vars.push(("RENEWAL_FOLLOWUP_MODE", "email"));
        assert_eq!(
            load_with(&vars).unwrap().reminders.renewal_followup_mode,
            FollowupMode::Email
        );
    }

    #[test]
    fn negative_lead_days_are_rejected() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("RENEWAL_REMINDER_LEAD_DAYS", "-1"));
        assert!(load_with(&vars).is_err());
    }

    #[test]
    fn zero_schedule_interval_is_rejected() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("REMINDER_SCHEDULE_INTERVAL_SECS", "0"));
        assert!(load_with(&vars).is_err());
    }
}
