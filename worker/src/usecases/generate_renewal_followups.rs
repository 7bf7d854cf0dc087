use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use crm::domain::{
    entities::{followups::InsertFollowupEntity, payments::RenewalCandidateEntity},
    repositories::renewal_followups::RenewalFollowupRepository,
    value_objects::enums::{
        followup_modes::FollowupMode, followup_statuses::FollowupStatus,
        followup_types::FollowupType,
    },
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RenewalFollowupSettings {
    pub lead_days: u64,
    pub followup_mode: FollowupMode,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RenewalGenerationReport {
    pub scanned: usize,
    pub created: usize,
    pub skipped_existing: usize,
    pub failed: usize,
    pub created_ids: Vec<Uuid>,
}

/// Opens a pending renewal follow-up for every payment renewing within the
/// lead window that does not already have an open one.
pub struct GenerateRenewalFollowupsUseCase {
    repository: Arc<dyn RenewalFollowupRepository + Send + Sync>,
    settings: RenewalFollowupSettings,
}

impl GenerateRenewalFollowupsUseCase {
    pub fn new(
        repository: Arc<dyn RenewalFollowupRepository + Send + Sync>,
        settings: RenewalFollowupSettings,
    ) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub async fn run(&self, today: NaiveDate) -> Result<RenewalGenerationReport> {
        let until = today
            .checked_add_days(Days::new(self.settings.lead_days))
            .context("renewal window end is out of range")?;

        let payments = self
            .repository
            .list_payments_renewing_between(today, until)
            .await
            .context("failed to list renewing payments")?;

        let mut report = RenewalGenerationReport {
            scanned: payments.len(),
            ..Default::default()
        };

        for payment in &payments {
            match self.open_followup(payment, today).await {
                Ok(Some(followup_id)) => {
                    report.created += 1;
                    report.created_ids.push(followup_id);
                }
                Ok(None) => report.skipped_existing += 1,
                Err(err) => {
                    error!(payment_id = %payment.id, error = ?err, "renewal followups: insert failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            %today,
            %until,
            scanned = report.scanned,
            created = report.created,
            skipped_existing = report.skipped_existing,
            failed = report.failed,
            "renewal followups: generation finished"
        );
        Ok(report)
    }

    async fn open_followup(
        &self,
        payment: &RenewalCandidateEntity,
        today: NaiveDate,
    ) -> Result<Option<Uuid>> {
        let Some(renewal_date) = payment.next_renewal_date else {
            return Ok(None);
        };

        if self.repository.has_open_renewal_followup(payment.id).await? {
            return Ok(None);
        }

        let reminder_date = renewal_date
            .checked_sub_days(Days::new(self.settings.lead_days))
            .map_or(today, |date| date.max(today));

        let followup_id = self
            .repository
            .insert_followup(InsertFollowupEntity {
                user_id: payment.user_id,
                client_id: payment.client_id,
                payment_id: Some(payment.id),
                followup_mode: self.settings.followup_mode.clone(),
                followup_type: FollowupType::PaymentRenewal,
                followup_status: FollowupStatus::Pending,
                is_renewal_reminder: Some(true),
                next_followup_date: Some(reminder_date),
                followup_remarks: None,
            })
            .await?;

        Ok(Some(followup_id))
    }
}
