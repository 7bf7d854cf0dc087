pub mod followup_reminders;
pub mod notifications;
pub mod renewal_followups;
