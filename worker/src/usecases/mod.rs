pub mod generate_renewal_followups;
pub mod send_followup_reminders;
