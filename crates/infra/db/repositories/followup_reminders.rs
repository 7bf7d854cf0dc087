use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::{
    RunQueryDsl, pg::Pg, prelude::*, query_builder::QueryFragment, query_dsl::LoadQuery,
    update,
};
use std::sync::Arc;
use tokio::task;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            clients::ClientContactEntity, followups::FollowupEntity,
            payments::PaymentRenewalEntity,
        },
        repositories::followup_reminders::FollowupReminderRepository,
        value_objects::{
            enums::{followup_statuses::FollowupStatus, followup_types::FollowupType},
            followups::DueFollowup,
        },
    },
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{clients, payment_followups, payments},
    },
};

type DueFollowupRow = (FollowupEntity, ClientContactEntity, Option<PaymentRenewalEntity>);

/// Pending follow-ups whose own date is today, plus pending renewal
/// follow-ups whose linked payment renews today.
fn due_followups_query(
    today: NaiveDate,
) -> impl LoadQuery<'static, PgConnection, DueFollowupRow> + QueryFragment<Pg> {
    payment_followups::table
        .inner_join(clients::table.on(payment_followups::client_id.eq(clients::id)))
        .left_join(payments::table.on(payment_followups::payment_id.eq(payments::id.nullable())))
        .filter(payment_followups::followup_status.eq(FollowupStatus::Pending))
        .filter(
            payment_followups::next_followup_date.eq(today).or(payment_followups::followup_type
                .eq(FollowupType::PaymentRenewal)
                .and(payments::next_renewal_date.eq(today))),
        )
        .select((
            FollowupEntity::as_select(),
            ClientContactEntity::as_select(),
            Option::<PaymentRenewalEntity>::as_select(),
        ))
}

pub struct FollowupReminderPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl FollowupReminderPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl FollowupReminderRepository for FollowupReminderPostgres {
    async fn list_due_followups(&self, today: NaiveDate) -> Result<Vec<DueFollowup>> {
        // Diesel is synchronous; keep DB work off the async workers.
        let db_pool = Arc::clone(&self.db_pool);

        Ok(task::spawn_blocking(move || -> Result<Vec<DueFollowup>> {
            let mut conn = db_pool.get()?;

            let rows = due_followups_query(today).load::<DueFollowupRow>(&mut conn)?;

            Ok(rows
                .into_iter()
                .map(|(followup, client, payment)| DueFollowup {
                    followup,
                    client,
                    payment,
                })
                .collect())
        })
        .await??)
    }

    async fn mark_followup_completed(&self, followup_id: Uuid, remarks: String) -> Result<Uuid> {
        let db_pool = Arc::clone(&self.db_pool);

        Ok(task::spawn_blocking(move || -> Result<Uuid> {
            let mut conn = db_pool.get()?;

            let updated_id =
                update(payment_followups::table.filter(payment_followups::id.eq(followup_id)))
                    .set((
                        payment_followups::followup_status.eq(FollowupStatus::Completed),
                        payment_followups::followup_remarks.eq(Some(remarks)),
                    ))
                    .returning(payment_followups::id)
                    .get_result::<Uuid>(&mut conn)?;

            Ok(updated_id)
        })
        .await??)
    }
}
