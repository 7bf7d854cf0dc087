pub mod domain;
pub mod infra;
pub mod notifications;
pub mod observability;
