use super::alerts::{AlertEvent, AlertSink};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use url::Url;

/// Discord rejects message content longer than this.
const DISCORD_CONTENT_LIMIT: usize = 2000;
const TRUNCATION_MARKER: &str = "\n... (truncated)";

pub(crate) struct DiscordAlertSink {
    webhook_url: Url,
    client: Client,
}

impl DiscordAlertSink {
    pub(crate) fn new(webhook_url: Url) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(3))
            .build()
            .context("failed to build Discord http client")?;

        Ok(Self {
            webhook_url,
            client,
        })
    }
}

#[async_trait]
impl AlertSink for DiscordAlertSink {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn deliver(&self, event: &AlertEvent) -> Result<()> {
        let response = self
            .client
            .post(self.webhook_url.clone())
            .json(&json!({ "content": render_alert(event) }))
            .send()
            .await
            // reqwest errors embed the URL, which carries the webhook token.
            .map_err(|err| anyhow::anyhow!("discord webhook request failed: {}", err.without_url()))?;

        if !response.status().is_success() {
            bail!("discord webhook returned {}", response.status());
        }
        Ok(())
    }
}

pub(crate) fn render_alert(event: &AlertEvent) -> String {
    let mut lines = vec![
        format!(
            "**{}** `{}` `{}` `{}`",
            event.service_name, event.stage, event.component, event.level
        ),
        format!(
            "`{}` `{}`{}",
            event.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            event.target,
            event
                .location
                .as_deref()
                .map(|loc| format!(" `{loc}`"))
                .unwrap_or_default()
        ),
    ];

    if let Some(message) = event.message.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        lines.push(format!("> {message}"));
    }

    if !event.span_path.is_empty() {
        lines.push(format!("spans: `{}`", event.span_path.join(" > ")));
    }

    lines.extend(
        event
            .fields
            .iter()
            .map(|(key, value)| format!("- `{key}` = `{value}`")),
    );

    truncate(lines.join("\n"))
}

fn truncate(content: String) -> String {
    if content.chars().count() <= DISCORD_CONTENT_LIMIT {
        return content;
    }

    let keep = DISCORD_CONTENT_LIMIT - TRUNCATION_MARKER.chars().count();
    let mut truncated: String = content.chars().take(keep).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}
