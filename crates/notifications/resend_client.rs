use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{
    repositories::notifications::EmailGateway,
    value_objects::notifications::{OutboundEmail, ProviderOutcome},
};

pub const RESEND_API_BASE: &str = "https://api.resend.com";
pub const DEFAULT_EMAIL_FROM: &str = "Growth Hub Manager <onboarding@resend.dev>";

#[derive(Debug, Clone)]
pub struct ResendConfig {
    pub api_key: Option<String>,
    pub from: String,
    pub api_base: String,
}

/// Minimal Resend client built on reqwest.
pub struct ResendClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct ResendSendResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResendErrorResponse {
    message: Option<String>,
    name: Option<String>,
}

impl ResendClient {
    pub fn new(api_key: String, api_base: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("failed to build Resend http client")?;

        Ok(Self {
            http,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Returns `None` when no API key is configured.
    pub fn from_config(config: &ResendConfig) -> Result<Option<Self>> {
        match config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => {
                Self::new(key.to_string(), config.api_base.clone()).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Sends one email. https://resend.com/docs/api-reference/emails/send-email
    pub async fn send(&self, email: &OutboundEmail) -> Result<ProviderOutcome> {
        let resp = self
            .http
            .post(format!("{}/emails", self.api_base))
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        let outcome = resend_outcome(status, &body);

        match &outcome {
            ProviderOutcome::Delivered { detail } => {
                info!(resend_email_id = %detail, "resend: email accepted");
            }
            ProviderOutcome::Rejected { reason } => {
                error!(status = %status, response_body = %body, reason = %reason, "resend: email rejected");
            }
        }

        Ok(outcome)
    }
}

#[async_trait]
impl EmailGateway for ResendClient {
    async fn send_email(&self, email: OutboundEmail) -> Result<ProviderOutcome> {
        self.send(&email).await
    }
}

pub(crate) fn resend_outcome(status: StatusCode, body: &str) -> ProviderOutcome {
    if status.is_success() {
        return match serde_json::from_str::<ResendSendResponse>(body) {
            Ok(ResendSendResponse { id: Some(id) }) => ProviderOutcome::Delivered { detail: id },
            _ => ProviderOutcome::Rejected {
                reason: format!("Resend error: unexpected response: {body}"),
            },
        };
    }

    let detail = match serde_json::from_str::<ResendErrorResponse>(body) {
        Ok(ResendErrorResponse {
            message: Some(message),
            ..
        }) => message,
        Ok(ResendErrorResponse {
            name: Some(name), ..
        }) => name,
        _ if body.trim().is_empty() => format!("status {status}"),
        _ => body.to_string(),
    };

    ProviderOutcome::Rejected {
        reason: format!("Resend error: {detail}"),
    }
}
