use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{error, info};

use crate::domain::{
    repositories::notifications::WhatsAppGateway,
    value_objects::notifications::{OutboundWhatsApp, ProviderOutcome},
};

pub const TWILIO_API_BASE: &str = "https://api.twilio.com";
pub const DEFAULT_COUNTRY_CODE: &str = "+91";

#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub whatsapp_from: Option<String>,
    pub country_code: String,
    pub api_base: String,
}

#[derive(Clone)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub whatsapp_from: String,
}

impl TwilioConfig {
    /// All three values must be present and non-blank.
    pub fn credentials(&self) -> Option<TwilioCredentials> {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Some(TwilioCredentials {
            account_sid: non_blank(&self.account_sid)?,
            auth_token: non_blank(&self.auth_token)?,
            whatsapp_from: non_blank(&self.whatsapp_from)?,
        })
    }
}

/// Recipient address for the WhatsApp channel. The stored number is appended
/// to the country code as-is.
pub fn whatsapp_address(country_code: &str, contact_number: &str) -> String {
    format!("whatsapp:{country_code}{contact_number}")
}

pub struct TwilioClient {
    http: reqwest::Client,
    credentials: TwilioCredentials,
    api_base: String,
}

impl TwilioClient {
    pub fn new(credentials: TwilioCredentials, api_base: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("failed to build Twilio http client")?;

        Ok(Self {
            http,
            credentials,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Returns `None` unless the account SID, auth token and sender are all set.
    pub fn from_config(config: &TwilioConfig) -> Result<Option<Self>> {
        config
            .credentials()
            .map(|credentials| Self::new(credentials, config.api_base.clone()))
            .transpose()
    }

    /// https://www.twilio.com/docs/messaging/api/message-resource#create-a-message-resource
    pub async fn send(&self, message: &OutboundWhatsApp) -> Result<ProviderOutcome> {
        let body = [
            ("From", self.credentials.whatsapp_from.as_str()),
            ("To", message.to.as_str()),
            ("Body", message.body.as_str()),
        ];

        let resp = self
            .http
            .post(format!(
                "{}/2010-04-01/Accounts/{}/Messages.json",
                self.api_base, self.credentials.account_sid
            ))
            .basic_auth(
                &self.credentials.account_sid,
                Some(&self.credentials.auth_token),
            )
            .form(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        let outcome = twilio_outcome(status, &text);

        match &outcome {
            ProviderOutcome::Delivered { detail } => {
                info!(twilio_message_sid = %detail, "twilio: whatsapp message queued");
            }
            ProviderOutcome::Rejected { reason } => {
                error!(status = %status, response_body = %text, reason = %reason, "twilio: whatsapp message rejected");
            }
        }

        Ok(outcome)
    }
}

#[async_trait]
impl WhatsAppGateway for TwilioClient {
    async fn send_whatsapp(&self, message: OutboundWhatsApp) -> Result<ProviderOutcome> {
        self.send(&message).await
    }
}

/// Folds the two failure shapes Twilio uses (non-2xx, and 2xx carrying an
/// `error_code`) into one rejection path.
pub(crate) fn twilio_outcome(status: StatusCode, body: &str) -> ProviderOutcome {
    let parsed = serde_json::from_str::<Value>(body);

    if status.is_success() {
        return match parsed {
            Ok(data) if !data["error_code"].is_null() => ProviderOutcome::Rejected {
                reason: format!(
                    "Twilio error: {} (code: {})",
                    text_or(&data["message"], "unknown error"),
                    text_or(&data["error_code"], "unknown"),
                ),
            },
            Ok(data) => ProviderOutcome::Delivered {
                detail: text_or(&data["sid"], ""),
            },
            Err(err) => ProviderOutcome::Rejected {
                reason: format!("WhatsApp error: invalid response body: {err}"),
            },
        };
    }

    let detail = match parsed {
        Ok(data) if data["message"].is_string() => text_or(&data["message"], ""),
        Ok(data) => data.to_string(),
        Err(_) => body.to_string(),
    };

    ProviderOutcome::Rejected {
        reason: format!("Failed to send WhatsApp: {detail}"),
    }
}

fn text_or(value: &Value, fallback: &str) -> String {
    match value {
        Value::Null => fallback.to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TwilioConfig {
        TwilioConfig {
            account_sid: Some("AC123".to_string()),
            auth_token: Some("secret".to_string()),
            whatsapp_from: Some("whatsapp:+14155238886".to_string()),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            api_base: TWILIO_API_BASE.to_string(),
        }
    }

    #[test]
    fn any_missing_credential_disables_the_channel() {
        assert!(config().credentials().is_some());

        let mut missing_sid = config();
        missing_sid.account_sid = None;
        assert!(missing_sid.credentials().is_none());

        let mut blank_token = config();
        blank_token.auth_token = Some(" ".to_string());
        assert!(blank_token.credentials().is_none());

        let mut missing_from = config();
        missing_from.whatsapp_from = None;
        assert!(TwilioClient::from_config(&missing_from).unwrap().is_none());
    }

    #[test]
    fn address_is_plain_concatenation() {
        assert_eq!(
            whatsapp_address(DEFAULT_COUNTRY_CODE, "9876543210"),
            "whatsapp:+919876543210"
        );
        assert_eq!(whatsapp_address("+91", "098 765"), "whatsapp:+91098 765");
    }

    #[test]
    fn queued_message_is_delivered() {
        let outcome = twilio_outcome(
            StatusCode::CREATED,
            r#"{"sid":"SM1","status":"queued","error_code":null,"error_message":null}"#,
        );
        assert_eq!(
            outcome,
            ProviderOutcome::Delivered {
                detail: "SM1".to_string()
            }
        );
    }

    #[test]
    fn success_status_with_error_code_is_rejected() {
        let outcome = twilio_outcome(
            StatusCode::OK,
            r#"{"sid":"SM1","error_code":63016,"message":"Outside the allowed window"}"#,
        );
        assert_eq!(
            outcome,
            ProviderOutcome::Rejected {
                reason: "Twilio error: Outside the allowed window (code: 63016)".to_string()
            }
        );
    }

    #[test]
    fn error_status_uses_provider_message() {
        let outcome = twilio_outcome(
            StatusCode::BAD_REQUEST,
            r#"{"code":21211,"message":"The 'To' number is not a valid phone number.","status":400}"#,
        );
        assert_eq!(
            outcome,
            ProviderOutcome::Rejected {
                reason: "Failed to send WhatsApp: The 'To' number is not a valid phone number."
                    .to_string()
            }
        );
    }

    #[test]
    fn error_status_with_text_body_is_quoted() {
        let outcome = twilio_outcome(StatusCode::SERVICE_UNAVAILABLE, "try later");
        assert_eq!(
            outcome,
            ProviderOutcome::Rejected {
                reason: "Failed to send WhatsApp: try later".to_string()
            }
        );
    }
}
