pub mod clients;
pub mod followups;
pub mod payments;
