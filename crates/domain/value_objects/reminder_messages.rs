use crate::domain::{
    entities::payments::PaymentRenewalEntity, value_objects::followups::DueFollowup,
};

const RENEWAL_SUBJECT: &str = "Payment Renewal Reminder";
const MANUAL_SUBJECT: &str = "Follow-up Reminder";
const SIGNATURE: &str = "Growth Hub Manager Team";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderMessage {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Picks the template for a due follow-up. A renewal follow-up that lost its
/// payment link keeps the renewal subject but falls back to the manual body.
pub fn render_reminder_message(due: &DueFollowup) -> ReminderMessage {
    match (&due.payment, due.is_renewal()) {
        (Some(payment), true) => render_renewal_message(due, payment),
        (None, true) => ReminderMessage {
            subject: RENEWAL_SUBJECT.to_string(),
            ..render_manual_message(due)
        },
        (_, false) => render_manual_message(due),
    }
}

pub fn render_renewal_message(due: &DueFollowup, payment: &PaymentRenewalEntity) -> ReminderMessage {
    let client = &due.client;
    let renewal_date = payment
        .next_renewal_date
        .map(|date| date.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    let html = format!(
        "<h2>Dear {contact},</h2>\
         <p>This is a reminder that your subscription payment is due for renewal.</p>\
         <p><strong>Company:</strong> {company}</p>\
         <p><strong>Subscription Plan:</strong> {plan}</p>\
         <p><strong>Amount:</strong> {amount}</p>\
         <p><strong>Renewal Date:</strong> {renewal_date}</p>\
         <p><strong>Remarks:</strong> {remarks}</p>\
         <p>Please contact us to complete your payment renewal.</p>\
         <p>Best regards,<br>{SIGNATURE}</p>",
        contact = escape_html(&client.contact_person_name),
        company = escape_html(&client.name),
        plan = payment.subscription_plan,
        amount = payment.amount,
        remarks = escape_html(remarks_or(due, "Please process the payment renewal")),
    );

    let text = format!(
        "Hello {contact},\n\n\
         This is a payment renewal reminder for {company}.\n\n\
         Subscription: {plan}\n\
         Amount: {amount}\n\
         Renewal Date: {renewal_date}\n\n\
         {remarks}\n\n\
         Best regards,\n{SIGNATURE}",
        contact = client.contact_person_name,
        company = client.name,
        plan = payment.subscription_plan,
        amount = payment.amount,
        remarks = remarks_or(due, "Please process your payment renewal."),
    );

    ReminderMessage {
        subject: RENEWAL_SUBJECT.to_string(),
        html,
        text,
    }
}

pub fn render_manual_message(due: &DueFollowup) -> ReminderMessage {
    let client = &due.client;

    let html = format!(
        "<h2>Dear {contact},</h2>\
         <p>This is a friendly follow-up reminder.</p>\
         <p><strong>Company:</strong> {company}</p>\
         <p><strong>Remarks:</strong> {remarks}</p>\
         <p>Please contact us if you have any questions or need assistance.</p>\
         <p>Best regards,<br>{SIGNATURE}</p>",
        contact = escape_html(&client.contact_person_name),
        company = escape_html(&client.name),
        remarks = escape_html(remarks_or(due, "No additional remarks")),
    );

    let text = format!(
        "Hello {contact},\n\n\
         This is a follow-up reminder for {company}.\n\n\
         {remarks}\n\n\
         Best regards,\n{SIGNATURE}",
        contact = client.contact_person_name,
        company = client.name,
        remarks = remarks_or(due, "Please contact us for further details."),
    );

    ReminderMessage {
        subject: MANUAL_SUBJECT.to_string(),
        html,
        text,
    }
}

fn remarks_or<'a>(due: &'a DueFollowup, fallback: &'a str) -> &'a str {
    due.followup
        .followup_remarks
        .as_deref()
        .filter(|remarks| !remarks.is_empty())
        .unwrap_or(fallback)
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{clients::ClientContactEntity, followups::FollowupEntity},
        value_objects::enums::{
            followup_modes::FollowupMode, followup_statuses::FollowupStatus,
            followup_types::FollowupType, subscription_plans::SubscriptionPlan,
        },
    };
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn due(followup_type: FollowupType, remarks: Option<&str>, with_payment: bool) -> DueFollowup {
        let now = Utc::now();
        DueFollowup {
            followup: FollowupEntity {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                client_id: Uuid::new_v4(),
                payment_id: with_payment.then(Uuid::new_v4),
                followup_mode: FollowupMode::Email,
                followup_type,
                followup_status: FollowupStatus::Pending,
                is_renewal_reminder: None,
                next_followup_date: None,
                followup_remarks: remarks.map(str::to_string),
                created_at: now,
                updated_at: now,
            },
            client: ClientContactEntity {
                name: "Acme & Sons".to_string(),
                contact_person_name: "Priya".to_string(),
                contact_number_1: "9876543210".to_string(),
                email_id: Some("priya@acme.test".to_string()),
            },
            payment: with_payment.then(|| PaymentRenewalEntity {
                amount: 1500.0,
                subscription_plan: SubscriptionPlan::ThreeMonth,
                next_renewal_date: NaiveDate::from_ymd_opt(2024, 3, 15),
            }),
        }
    }

    #[test]
    fn renewal_message_quotes_plan_amount_and_date() {
        let message = render_reminder_message(&due(FollowupType::PaymentRenewal, None, true));

        assert_eq!(message.subject, "Payment Renewal Reminder");
        assert!(message.text.contains("Subscription: 3_month\nAmount: 1500\nRenewal Date: 2024-03-15"));
        assert!(message.text.contains("Please process your payment renewal."));
        assert!(message.html.contains("<strong>Amount:</strong> 1500</p>"));
        assert!(message.html.contains("Please process the payment renewal"));
    }

    #[test]
    fn manual_message_uses_remarks_when_present() {
        let message =
            render_reminder_message(&due(FollowupType::Manual, Some("Discuss upgrade"), false));

        assert_eq!(message.subject, "Follow-up Reminder");
        assert_eq!(
            message.text,
            "Hello Priya,\n\nThis is a follow-up reminder for Acme & Sons.\n\nDiscuss upgrade\n\nBest regards,\nGrowth Hub Manager Team"
        );
    }

    #[test]
    fn empty_remarks_fall_back_to_default_copy() {
        let message = render_reminder_message(&due(FollowupType::Manual, Some(""), false));
        assert!(message.text.contains("Please contact us for further details."));
        assert!(message.html.contains("No additional remarks"));
    }

    #[test]
    fn renewal_without_payment_uses_manual_body_under_renewal_subject() {
        let message = render_reminder_message(&due(FollowupType::PaymentRenewal, None, false));
        assert_eq!(message.subject, "Payment Renewal Reminder");
        assert!(message.text.contains("This is a follow-up reminder for"));
    }

    #[test]
    fn html_body_escapes_interpolated_values() {
        let message = render_reminder_message(&due(FollowupType::Manual, Some("<b>hi</b>"), false));
        assert!(message.html.contains("Acme &amp; Sons"));
        assert!(message.html.contains("&lt;b&gt;hi&lt;/b&gt;"));
        assert!(message.text.contains("<b>hi</b>"));
    }
}
