use anyhow::{Context, Result};
use chrono::NaiveDate;
use crm::{
    domain::{
        repositories::{
            followup_reminders::FollowupReminderRepository,
            notifications::{EmailGateway, WhatsAppGateway},
        },
        value_objects::{
            enums::followup_modes::FollowupMode,
            followups::{
                DispatchOutcome, DueFollowup, ReminderResult, ReminderRunReport, append_remark,
                audit_line,
            },
            notifications::{OutboundEmail, OutboundWhatsApp, ProviderOutcome},
            reminder_messages::render_reminder_message,
        },
    },
    notifications::twilio_client::whatsapp_address,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Channel settings that do not belong to a provider client.
#[derive(Debug, Clone)]
pub struct ReminderChannels {
    pub email_from: String,
    pub whatsapp_country_code: String,
}

/// One reminder run: select what is due, notify each record once, close the
/// ones that were delivered. A gateway of `None` means its credentials are
/// not configured; records on that channel fail without any provider call.
pub struct SendFollowupRemindersUseCase {
    repository: Arc<dyn FollowupReminderRepository + Send + Sync>,
    email_gateway: Option<Arc<dyn EmailGateway + Send + Sync>>,
    whatsapp_gateway: Option<Arc<dyn WhatsAppGateway + Send + Sync>>,
    channels: ReminderChannels,
}

impl SendFollowupRemindersUseCase {
    pub fn new(
        repository: Arc<dyn FollowupReminderRepository + Send + Sync>,
        email_gateway: Option<Arc<dyn EmailGateway + Send + Sync>>,
        whatsapp_gateway: Option<Arc<dyn WhatsAppGateway + Send + Sync>>,
        channels: ReminderChannels,
    ) -> Self {
        Self {
            repository,
            email_gateway,
            whatsapp_gateway,
            channels,
        }
    }

    pub async fn run(&self, today: NaiveDate) -> Result<ReminderRunReport> {
        let due_followups = self
            .repository
            .list_due_followups(today)
            .await
            .context("failed to load due followups")?;

        info!(%today, due = due_followups.len(), "followup reminders: run started");

        let mut results = Vec::with_capacity(due_followups.len());
        for due in &due_followups {
            let followup_id = due.followup.id;

            let outcome = match self.process(due, today).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!(%followup_id, error = ?err, "followup reminders: record failed");
                    DispatchOutcome::failed(format!("Error: {err}"))
                }
            };

            if !outcome.success {
                warn!(%followup_id, mode = %due.followup.followup_mode, message = %outcome.message, "followup reminders: not delivered");
            }

            results.push(ReminderResult {
                followup_id,
                client_name: due.client.name.clone(),
                mode: due.followup.followup_mode.clone(),
                followup_type: due.followup.followup_type,
                success: outcome.success,
                message: outcome.message,
            });
        }

        let report = ReminderRunReport::from_results(results);
        info!(
            processed = report.results.len(),
            delivered = report.results.iter().filter(|r| r.success).count(),
            "followup reminders: run finished"
        );
        Ok(report)
    }

    async fn process(&self, due: &DueFollowup, today: NaiveDate) -> Result<DispatchOutcome> {
        let outcome = self.dispatch(due).await;

        if outcome.success {
            let line = audit_line(today, due.followup.followup_type, &outcome.message);
            let remarks = append_remark(due.followup.followup_remarks.as_deref(), &line);
            self.repository
                .mark_followup_completed(due.followup.id, remarks)
                .await?;
        }

        Ok(outcome)
    }

    /// Never fails; every problem becomes an unsuccessful outcome.
    pub async fn dispatch(&self, due: &DueFollowup) -> DispatchOutcome {
        match &due.followup.followup_mode {
            FollowupMode::Email => self.send_email(due).await,
            FollowupMode::Whatsapp => self.send_whatsapp(due).await,
            FollowupMode::Phone if due.is_renewal() => DispatchOutcome::delivered(
                "Phone reminder logged for payment renewal - manual call required",
            ),
            FollowupMode::Phone => {
                DispatchOutcome::delivered("Phone reminder logged - manual call required")
            }
            FollowupMode::Unknown(_) => DispatchOutcome::failed("Unknown followup mode"),
        }
    }

    async fn send_email(&self, due: &DueFollowup) -> DispatchOutcome {
        let Some(email) = due.client.email_id.as_deref().filter(|e| !e.is_empty()) else {
            return DispatchOutcome::failed("No email address available");
        };
        let Some(gateway) = self.email_gateway.as_ref() else {
            return DispatchOutcome::failed("Resend API key not configured");
        };

        let message = render_reminder_message(due);
        let email_request = OutboundEmail {
            from: self.channels.email_from.clone(),
            to: vec![email.to_string()],
            subject: message.subject,
            html: message.html,
        };

        match gateway.send_email(email_request).await {
            Ok(ProviderOutcome::Delivered { .. }) => {
                DispatchOutcome::delivered(format!("Email sent successfully to {email}"))
            }
            Ok(ProviderOutcome::Rejected { reason }) => DispatchOutcome::failed(reason),
            Err(err) => DispatchOutcome::failed(format!("Failed to send email: {err}")),
        }
    }

    async fn send_whatsapp(&self, due: &DueFollowup) -> DispatchOutcome {
        let Some(gateway) = self.whatsapp_gateway.as_ref() else {
            return DispatchOutcome::failed("Twilio credentials not configured");
        };

        let number = &due.client.contact_number_1;
        let message = OutboundWhatsApp {
            to: whatsapp_address(&self.channels.whatsapp_country_code, number),
            body: render_reminder_message(due).text,
        };

        match gateway.send_whatsapp(message).await {
            Ok(ProviderOutcome::Delivered { .. }) => {
                DispatchOutcome::delivered(format!("WhatsApp message sent to {number}"))
            }
            Ok(ProviderOutcome::Rejected { reason }) => DispatchOutcome::failed(reason),
            Err(err) => DispatchOutcome::failed(format!("WhatsApp error: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::Utc;
    use crm::domain::{
        entities::{
            clients::ClientContactEntity, followups::FollowupEntity,
            payments::PaymentRenewalEntity,
        },
        repositories::{
            followup_reminders::MockFollowupReminderRepository,
            notifications::{MockEmailGateway, MockWhatsAppGateway},
        },
        value_objects::enums::{
            followup_statuses::FollowupStatus, followup_types::FollowupType,
            subscription_plans::SubscriptionPlan,
        },
    };
    use mockall::predicate::eq;
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn channels() -> ReminderChannels {
        ReminderChannels {
            email_from: "Growth Hub Manager <onboarding@resend.dev>".to_string(),
            whatsapp_country_code: "+91".to_string(),
        }
    }

    fn due(mode: FollowupMode, followup_type: FollowupType) -> DueFollowup {
        let now = Utc::now();
        DueFollowup {
            followup: FollowupEntity {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                client_id: Uuid::new_v4(),
                payment_id: None,
                followup_mode: mode,
                followup_type,
                followup_status: FollowupStatus::Pending,
                is_renewal_reminder: None,
                next_followup_date: Some(today()),
                followup_remarks: None,
                created_at: now,
                updated_at: now,
            },
            client: ClientContactEntity {
                name: "Acme".to_string(),
                contact_person_name: "Priya".to_string(),
                contact_number_1: "9876543210".to_string(),
                email_id: Some("priya@acme.test".to_string()),
            },
            payment: None,
        }
    }

    fn repository_returning(rows: Vec<DueFollowup>) -> MockFollowupReminderRepository {
        let mut repository = MockFollowupReminderRepository::new();
        repository
            .expect_list_due_followups()
            .with(eq(today()))
            .times(1)
            .returning(move |_| {
                let rows = rows.clone();
                Box::pin(async move { Ok(rows) })
            });
        repository
    }

    fn usecase(
        repository: MockFollowupReminderRepository,
        email: Option<MockEmailGateway>,
        whatsapp: Option<MockWhatsAppGateway>,
    ) -> SendFollowupRemindersUseCase {
        SendFollowupRemindersUseCase::new(
            Arc::new(repository),
            email.map(|g| Arc::new(g) as Arc<dyn EmailGateway + Send + Sync>),
            whatsapp.map(|g| Arc::new(g) as Arc<dyn WhatsAppGateway + Send + Sync>),
            channels(),
        )
    }

    #[tokio::test]
    async fn delivered_email_completes_followup_and_appends_audit_line() {
        let mut row = due(FollowupMode::Email, FollowupType::Manual);
        row.followup.followup_remarks = Some("Asked for a callback".to_string());
        let followup_id = row.followup.id;

        let mut repository = repository_returning(vec![row]);
        repository
            .expect_mark_followup_completed()
            .with(
                eq(followup_id),
                eq("Asked for a callback\n\nAuto-reminder sent on 2024-03-15: Email sent successfully to priya@acme.test".to_string()),
            )
            .times(1)
            .returning(|id, _| Box::pin(async move { Ok(id) }));

        let mut email = MockEmailGateway::new();
        email
            .expect_send_email()
            .withf(|email| {
                email.to == vec!["priya@acme.test".to_string()]
                    && email.subject == "Follow-up Reminder"
                    && email.from == "Growth Hub Manager <onboarding@resend.dev>"
            })
            .times(1)
            .returning(|_| {
                Box::pin(async {
                    Ok(ProviderOutcome::Delivered {
                        detail: "re_1".to_string(),
                    })
                })
            });

        let report = usecase(repository, Some(email), None)
            .run(today())
            .await
            .unwrap();

        assert_eq!(report.message, "Processed 1 followup reminders");
        assert_eq!(report.results.len(), 1);
        let result = &report.results[0];
        assert!(result.success);
        assert_eq!(result.followup_id, followup_id);
        assert_eq!(result.client_name, "Acme");
        assert_eq!(result.message, "Email sent successfully to priya@acme.test");
    }

    #[tokio::test]
    async fn email_without_address_fails_without_calling_provider() {
        let mut row = due(FollowupMode::Email, FollowupType::Manual);
        row.client.email_id = None;

        let mut repository = repository_returning(vec![row]);
        repository.expect_mark_followup_completed().times(0);

        let mut email = MockEmailGateway::new();
        email.expect_send_email().times(0);

        let report = usecase(repository, Some(email), None)
            .run(today())
            .await
            .unwrap();

        assert!(!report.results[0].success);
        assert_eq!(report.results[0].message, "No email address available");
    }

    #[tokio::test]
    async fn email_without_api_key_is_reported() {
        let mut repository = repository_returning(vec![due(FollowupMode::Email, FollowupType::Manual)]);
        repository.expect_mark_followup_completed().times(0);

        let report = usecase(repository, None, None).run(today()).await.unwrap();

        assert_eq!(report.results[0].message, "Resend API key not configured");
    }

    #[tokio::test]
    async fn email_transport_error_is_a_failure_entry() {
        let mut repository = repository_returning(vec![due(FollowupMode::Email, FollowupType::Manual)]);
        repository.expect_mark_followup_completed().times(0);

        let mut email = MockEmailGateway::new();
        email
            .expect_send_email()
            .times(1)
            .returning(|_| Box::pin(async { Err(anyhow!("connection reset")) }));

        let report = usecase(repository, Some(email), None)
            .run(today())
            .await
            .unwrap();

        assert_eq!(report.results[0].message, "Failed to send email: connection reset");
    }

    #[tokio::test]
    async fn whatsapp_without_credentials_never_calls_provider() {
        let mut repository =
            repository_returning(vec![due(FollowupMode::Whatsapp, FollowupType::Manual)]);
        repository.expect_mark_followup_completed().times(0);

        let report = usecase(repository, None, None).run(today()).await.unwrap();

        assert!(!report.results[0].success);
        assert_eq!(report.results[0].message, "Twilio credentials not configured");
    }

    #[tokio::test]
    async fn whatsapp_rejection_with_error_code_leaves_row_pending() {
        let mut repository =
            repository_returning(vec![due(FollowupMode::Whatsapp, FollowupType::Manual)]);
        repository.expect_mark_followup_completed().times(0);

        let mut whatsapp = MockWhatsAppGateway::new();
        whatsapp
            .expect_send_whatsapp()
            .withf(|message| {
                message.to == "whatsapp:+919876543210"
                    && message.body.starts_with("Hello Priya,")
            })
            .times(1)
            .returning(|_| {
                Box::pin(async {
                    Ok(ProviderOutcome::Rejected {
                        reason: "Twilio error: Outside the allowed window (code: 63016)"
                            .to_string(),
                    })
                })
            });

        let report = usecase(repository, None, Some(whatsapp))
            .run(today())
            .await
            .unwrap();

        assert!(!report.results[0].success);
        assert_eq!(
            report.results[0].message,
            "Twilio error: Outside the allowed window (code: 63016)"
        );
    }

    #[tokio::test]
    async fn delivered_whatsapp_reports_contact_number() {
        let row = due(FollowupMode::Whatsapp, FollowupType::Manual);
        let mut repository = repository_returning(vec![row]);
        repository
            .expect_mark_followup_completed()
            .times(1)
            .returning(|id, _| Box::pin(async move { Ok(id) }));

        let mut whatsapp = MockWhatsAppGateway::new();
        whatsapp.expect_send_whatsapp().times(1).returning(|_| {
            Box::pin(async {
                Ok(ProviderOutcome::Delivered {
                    detail: "SM1".to_string(),
                })
            })
        });

        let report = usecase(repository, None, Some(whatsapp))
            .run(today())
            .await
            .unwrap();

        assert!(report.results[0].success);
        assert_eq!(report.results[0].message, "WhatsApp message sent to 9876543210");
    }

    #[tokio::test]
    async fn phone_renewal_is_logged_and_completed() {
        let mut row = due(FollowupMode::Phone, FollowupType::PaymentRenewal);
        row.payment = Some(PaymentRenewalEntity {
            amount: 1500.0,
            subscription_plan: SubscriptionPlan::Monthly,
            next_renewal_date: Some(today()),
        });
        let followup_id = row.followup.id;

        let mut repository = repository_returning(vec![row]);
        repository
            .expect_mark_followup_completed()
            .with(
                eq(followup_id),
                eq("Auto-renewal reminder sent on 2024-03-15: Phone reminder logged for payment renewal - manual call required".to_string()),
            )
            .times(1)
            .returning(|id, _| Box::pin(async move { Ok(id) }));

        let report = usecase(repository, None, None).run(today()).await.unwrap();

        assert!(report.results[0].success);
        assert_eq!(
            report.results[0].message,
            "Phone reminder logged for payment renewal - manual call required"
        );
    }

    #[tokio::test]
    async fn unknown_mode_is_a_failure() {
        let mut repository = repository_returning(vec![due(
            FollowupMode::Unknown("sms".to_string()),
            FollowupType::Manual,
        )]);
        repository.expect_mark_followup_completed().times(0);

        let report = usecase(repository, None, None).run(today()).await.unwrap();

        assert!(!report.results[0].success);
        assert_eq!(report.results[0].message, "Unknown followup mode");
        assert_eq!(report.results[0].mode, FollowupMode::Unknown("sms".to_string()));
    }

    #[tokio::test]
    async fn failed_status_update_becomes_error_entry_and_batch_continues() {
        let first = due(FollowupMode::Phone, FollowupType::Manual);
        let second = due(FollowupMode::Phone, FollowupType::Manual);
        let first_id = first.followup.id;

        let mut repository = repository_returning(vec![first, second]);
        repository
            .expect_mark_followup_completed()
            .times(2)
            .returning(move |id, _| {
                Box::pin(async move {
                    if id == first_id {
                        Err(anyhow!("connection lost"))
                    } else {
                        Ok(id)
                    }
                })
            });

        let report = usecase(repository, None, None).run(today()).await.unwrap();

        assert_eq!(report.message, "Processed 2 followup reminders");
        assert!(!report.results[0].success);
        assert_eq!(report.results[0].message, "Error: connection lost");
        assert!(report.results[1].success);
    }

    #[tokio::test]
    async fn selection_failure_aborts_the_run() {
        let mut repository = MockFollowupReminderRepository::new();
        repository
            .expect_list_due_followups()
            .times(1)
            .returning(|_| Box::pin(async { Err(anyhow!("relation does not exist")) }));
        repository.expect_mark_followup_completed().times(0);

        let mut email = MockEmailGateway::new();
        email.expect_send_email().times(0);

        let err = usecase(repository, Some(email), None)
            .run(today())
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("relation does not exist"));
    }

    #[tokio::test]
    async fn empty_selection_reports_zero() {
        let repository = repository_returning(Vec::new());

        let report = usecase(repository, None, None).run(today()).await.unwrap();

        assert_eq!(report.message, "Processed 0 followup reminders");
        assert!(report.results.is_empty());
    }
}
