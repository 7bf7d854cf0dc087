pub mod followup_reminders;
pub mod renewal_followups;
