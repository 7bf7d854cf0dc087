use super::alerts::{AlertDispatcher, AlertEvent, DISPATCHER_TARGET};
use super::settings::ServiceIdentity;
use chrono::Utc;
use std::collections::BTreeMap;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

const REDACTED: &str = "[REDACTED]";
const SENSITIVE_KEY_PARTS: [&str; 7] = [
    "webhook",
    "secret",
    "password",
    "token",
    "authorization",
    "api_key",
    "apikey",
];

/// Forwards events at or above `min_level` to the alert dispatcher.
pub(crate) struct AlertLayer {
    dispatcher: AlertDispatcher,
    identity: ServiceIdentity,
    min_level: Level,
}

impl AlertLayer {
    pub(crate) fn new(dispatcher: AlertDispatcher, identity: ServiceIdentity, min_level: Level) -> Self {
        Self {
            dispatcher,
            identity,
            min_level,
        }
    }
}

#[derive(Default)]
struct FieldCollector {
    values: BTreeMap<String, String>,
}

impl FieldCollector {
    fn insert(&mut self, field: &Field, value: String) {
        self.values
            .insert(field.name().to_string(), redact(field.name(), value));
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.to_string());
    }
}

impl<S> Layer<S> for AlertLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        // Level ordering in tracing: ERROR is the "smallest".
        if *metadata.level() > self.min_level || metadata.target() == DISPATCHER_TARGET {
            return;
        }

        let mut collector = FieldCollector::default();
        event.record(&mut collector);
        let message = collector.values.remove("message");

        let span_path = ctx
            .event_span(event)
            .map(|span| {
                span.scope()
                    .from_root()
                    .map(|s| s.metadata().name().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let location = match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => Some(format!("{file}:{line}")),
            _ => None,
        };

        self.dispatcher.push(AlertEvent {
            level: *metadata.level(),
            timestamp: Utc::now(),
            service_name: self.identity.service_name.clone(),
            stage: self.identity.stage.clone(),
            component: self.identity.component.clone(),
            target: metadata.target().to_string(),
            location,
            message,
            fields: collector.values,
            span_path,
        });
    }
}

pub(crate) fn redact(field_name: &str, value: String) -> String {
    let name = field_name.to_ascii_lowercase();
    if SENSITIVE_KEY_PARTS.iter().any(|part| name.contains(part)) {
        REDACTED.to_string()
    } else {
        value
    }
}
