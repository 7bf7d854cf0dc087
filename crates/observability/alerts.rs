use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{Level, warn};

const ALERT_QUEUE_CAPACITY: usize = 256;

/// Target for the dispatcher's own diagnostics; never forwarded as an alert.
pub(crate) const DISPATCHER_TARGET: &str = "crm::alerts";

#[derive(Debug, Clone)]
pub(crate) struct AlertEvent {
    pub(crate) level: Level,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) service_name: String,
    pub(crate) stage: String,
    pub(crate) component: String,
    pub(crate) target: String,
    pub(crate) location: Option<String>,
    pub(crate) message: Option<String>,
    pub(crate) fields: BTreeMap<String, String>,
    pub(crate) span_path: Vec<String>,
}

#[async_trait]
pub(crate) trait AlertSink: Send + Sync {
    fn name(&self) -> &'static str;
    async fn deliver(&self, event: &AlertEvent) -> Result<()>;
}

/// Fan-out queue between the tracing layer and the sinks. Events are dropped
/// rather than blocking the caller when the queue is saturated.
#[derive(Clone)]
pub(crate) struct AlertDispatcher {
    tx: mpsc::Sender<AlertEvent>,
}

impl AlertDispatcher {
    /// Must be called from within a tokio runtime.
    pub(crate) fn spawn(sinks: Vec<Arc<dyn AlertSink>>) -> Self {
        let (tx, mut rx) = mpsc::channel::<AlertEvent>(ALERT_QUEUE_CAPACITY);

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                for sink in &sinks {
                    if let Err(error) = sink.deliver(&event).await {
                        warn!(target: DISPATCHER_TARGET, sink = sink.name(), error = %error, "alert sink failed");
                    }
                }
            }
        });

        Self { tx }
    }

    pub(crate) fn push(&self, event: AlertEvent) {
        if let Err(err) = self.tx.try_send(event) {
            let reason = match err {
                mpsc::error::TrySendError::Full(_) => "full",
                mpsc::error::TrySendError::Closed(_) => "closed",
            };
            warn!(target: DISPATCHER_TARGET, reason, "alert queue unavailable; dropping event");
        }
    }
}
