use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::automock;
use uuid::Uuid;

use crate::domain::value_objects::followups::DueFollowup;

#[async_trait]
#[automock]
pub trait FollowupReminderRepository {
    /// Pending follow-ups due on `today`, joined with their client and payment.
    async fn list_due_followups(&self, today: NaiveDate) -> Result<Vec<DueFollowup>>;

    /// Marks the follow-up completed and stores the merged remarks.
    async fn mark_followup_completed(&self, followup_id: Uuid, remarks: String) -> Result<Uuid>;
}
