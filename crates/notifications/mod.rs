pub mod resend_client;
pub mod twilio_client;
