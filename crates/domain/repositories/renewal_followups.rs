use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    followups::InsertFollowupEntity, payments::RenewalCandidateEntity,
};

#[async_trait]
#[automock]
pub trait RenewalFollowupRepository {
    async fn list_payments_renewing_between(
        &self,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<RenewalCandidateEntity>>;

    /// True when a renewal follow-up for the payment is still pending or scheduled.
    async fn has_open_renewal_followup(&self, payment_id: Uuid) -> Result<bool>;

    async fn insert_followup(&self, followup: InsertFollowupEntity) -> Result<Uuid>;
}
