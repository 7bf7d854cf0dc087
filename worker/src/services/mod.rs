pub mod reminder_schedule;
