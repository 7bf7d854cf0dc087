use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::value_objects::enums::{
        followup_modes::FollowupMode, followup_statuses::FollowupStatus,
        followup_types::FollowupType,
    },
    infra::db::postgres::schema::payment_followups,
};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payment_followups)]
pub struct FollowupEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub client_id: Uuid,
    pub payment_id: Option<Uuid>,
    pub followup_mode: FollowupMode,
    pub followup_type: FollowupType,
    pub followup_status: FollowupStatus,
    pub is_renewal_reminder: Option<bool>,
    pub next_followup_date: Option<NaiveDate>,
    pub followup_remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = payment_followups)]
pub struct InsertFollowupEntity {
    pub user_id: Uuid,
    pub client_id: Uuid,
    pub payment_id: Option<Uuid>,
    pub followup_mode: FollowupMode,
    pub followup_type: FollowupType,
    pub followup_status: FollowupStatus,
    pub is_renewal_reminder: Option<bool>,
    pub next_followup_date: Option<NaiveDate>,
    pub followup_remarks: Option<String>,
}
