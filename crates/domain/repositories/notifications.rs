use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::notifications::{
    OutboundEmail, OutboundWhatsApp, ProviderOutcome,
};

#[async_trait]
#[automock]
pub trait EmailGateway {
    async fn send_email(&self, email: OutboundEmail) -> Result<ProviderOutcome>;
}

#[async_trait]
#[automock]
pub trait WhatsAppGateway {
    async fn send_whatsapp(&self, message: OutboundWhatsApp) -> Result<ProviderOutcome>;
}
