use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::{
    RunQueryDsl, dsl::exists, insert_into, pg::Pg, prelude::*, query_builder::QueryFragment,
    query_dsl::LoadQuery, select,
};
use std::sync::Arc;
use tokio::task;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{followups::InsertFollowupEntity, payments::RenewalCandidateEntity},
        repositories::renewal_followups::RenewalFollowupRepository,
        value_objects::enums::{followup_statuses::FollowupStatus, followup_types::FollowupType},
    },
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{payment_followups, payments},
    },
};

/// Any renewal follow-up for the payment that is not completed yet.
fn open_renewal_followup_query(
    payment_id: Uuid,
) -> impl LoadQuery<'static, PgConnection, bool> + QueryFragment<Pg> {
    select(exists(
        payment_followups::table
            .filter(payment_followups::payment_id.eq(payment_id))
            .filter(payment_followups::followup_type.eq(FollowupType::PaymentRenewal))
            .filter(payment_followups::followup_status.ne(FollowupStatus::Completed)),
    ))
}

pub struct RenewalFollowupPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl RenewalFollowupPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl RenewalFollowupRepository for RenewalFollowupPostgres {
    async fn list_payments_renewing_between(
        &self,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<RenewalCandidateEntity>> {
        let db_pool = Arc::clone(&self.db_pool);

        Ok(task::spawn_blocking(move || -> Result<Vec<RenewalCandidateEntity>> {
            let mut conn = db_pool.get()?;

            let result = payments::table
                .select(RenewalCandidateEntity::as_select())
                .filter(payments::next_renewal_date.ge(from))
                .filter(payments::next_renewal_date.le(until))
                .order(payments::next_renewal_date.asc())
                .load::<RenewalCandidateEntity>(&mut conn)?;

            Ok(result)
        })
        .await??)
    }

    async fn has_open_renewal_followup(&self, payment_id: Uuid) -> Result<bool> {
        let db_pool = Arc::clone(&self.db_pool);

        Ok(task::spawn_blocking(move || -> Result<bool> {
            let mut conn = db_pool.get()?;

            let open = open_renewal_followup_query(payment_id).get_result::<bool>(&mut conn)?;

            Ok(open)
        })
        .await??)
    }

    async fn insert_followup(&self, followup: InsertFollowupEntity) -> Result<Uuid> {
        let db_pool = Arc::clone(&self.db_pool);

        Ok(task::spawn_blocking(move || -> Result<Uuid> {
            let mut conn = db_pool.get()?;

            let inserted_id = insert_into(payment_followups::table)
                .values(&followup)
                .returning(payment_followups::id)
                .get_result::<Uuid>(&mut conn)?;

            Ok(inserted_id)
        })
        .await??)
    }
}
