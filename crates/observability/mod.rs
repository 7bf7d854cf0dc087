//! Tracing setup shared by every binary: a fmt layer filtered by `RUST_LOG`
//! and, when a webhook is configured, a Discord alert layer.

mod alert_layer;
mod alerts;
mod discord;
mod settings;

use alert_layer::AlertLayer;
use alerts::{AlertDispatcher, AlertSink};
use anyhow::Result;
use discord::DiscordAlertSink;
use settings::AlertSettings;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Installs the global subscriber. Call once, inside the tokio runtime.
pub fn init_observability(component: &str) -> Result<()> {
    let settings = AlertSettings::from_env(component);

    let alert_layer = match settings.discord.as_ref() {
        Some(discord) => {
            let sink: Arc<dyn AlertSink> = Arc::new(DiscordAlertSink::new(discord.webhook_url.clone())?);
            let dispatcher = AlertDispatcher::spawn(vec![sink]);
            Some(
                AlertLayer::new(dispatcher, settings.identity.clone(), discord.min_level)
                    .with_filter(LevelFilter::from_level(discord.min_level)),
            )
        }
        None => None,
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Local offset so operators see their own timezone in the logs.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(alert_layer)
        .with(env_filter)
        .try_init()?;

    let identity = &settings.identity;
    for warning in &settings.warnings {
        warn!(
            service = %identity.service_name,
            stage = %identity.stage,
            component = %identity.component,
            %warning,
            "observability config warning"
        );
    }

    info!(
        service = %identity.service_name,
        stage = %identity.stage,
        component = %identity.component,
        discord_alerts = settings.discord.is_some(),
        "observability initialized"
    );

    Ok(())
}
