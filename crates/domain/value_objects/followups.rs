use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    entities::{
        clients::ClientContactEntity, followups::FollowupEntity, payments::PaymentRenewalEntity,
    },
    value_objects::enums::{followup_modes::FollowupMode, followup_types::FollowupType},
};

/// A pending follow-up joined with the client it addresses and, for renewal
/// reminders, the payment it refers to.
#[derive(Debug, Clone)]
pub struct DueFollowup {
    pub followup: FollowupEntity,
    pub client: ClientContactEntity,
    pub payment: Option<PaymentRenewalEntity>,
}

impl DueFollowup {
    pub fn is_renewal(&self) -> bool {
        self.followup.followup_type.is_renewal()
    }
}

/// Outcome of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub success: bool,
    pub message: String,
}

impl DispatchOutcome {
    pub fn delivered(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReminderResult {
    pub followup_id: Uuid,
    pub client_name: String,
    pub mode: FollowupMode,
    #[serde(rename = "type")]
    pub followup_type: FollowupType,
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReminderRunReport {
    pub message: String,
    pub results: Vec<ReminderResult>,
}

impl ReminderRunReport {
    pub fn from_results(results: Vec<ReminderResult>) -> Self {
        Self {
            message: format!("Processed {} followup reminders", results.len()),
            results,
        }
    }
}

pub fn audit_line(today: NaiveDate, followup_type: FollowupType, message: &str) -> String {
    match followup_type {
        FollowupType::PaymentRenewal => {
            format!("Auto-renewal reminder sent on {today}: {message}")
        }
        FollowupType::Manual => format!("Auto-reminder sent on {today}: {message}"),
    }
}

/// Appends `line` below the existing remarks, separated by a blank line.
pub fn append_remark(existing: Option<&str>, line: &str) -> String {
    format!("{}\n\n{}", existing.unwrap_or_default(), line)
        .trim()
        .to_string()
}
