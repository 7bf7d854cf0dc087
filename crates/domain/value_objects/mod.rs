pub mod enums;
pub mod followups;
pub mod notifications;
pub mod reminder_messages;
