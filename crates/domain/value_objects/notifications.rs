use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundWhatsApp {
    /// Full `whatsapp:+<country><number>` address.
    pub to: String,
    pub body: String,
}

/// Normalised answer of a notification provider. Transport failures are not
/// represented here; they surface as `Err` from the gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    Delivered { detail: String },
    Rejected { reason: String },
}
