use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::value_objects::enums::subscription_plans::SubscriptionPlan,
    infra::db::postgres::schema::payments,
};

/// Payment columns quoted in a renewal reminder.
#[derive(Debug, Clone, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct PaymentRenewalEntity {
    pub amount: f64,
    pub subscription_plan: SubscriptionPlan,
    pub next_renewal_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct RenewalCandidateEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub client_id: Uuid,
    pub next_renewal_date: Option<NaiveDate>,
}
