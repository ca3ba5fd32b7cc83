//! Payment provider integration
//!
//! The [`PaymentGateway`] trait is the seam between the HTTP handlers and the
//! provider. [`MercadoPagoClient`] talks to the real API; tests substitute
//! their own implementation.

pub mod client;
pub mod webhook;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use crate::pricing::PaymentPreference;

pub use client::MercadoPagoClient;
pub use webhook::{process_notification, WebhookNotification, WebhookOutcome};

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("request to payment provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("payment provider returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("unexpected payment provider response: {0}")]
    InvalidResponse(String),
}

/// Preference as acknowledged by the provider
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedPreference {
    pub id: String,
    /// Checkout URL the participant is redirected to
    pub init_point: String,
}

/// Payment state reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Approved,
    Pending,
    InProcess,
    Authorized,
    Rejected,
    Cancelled,
    Refunded,
    ChargedBack,
    #[serde(other)]
    Other,
}

/// Payment details fetched from the provider
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Payment {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub status: PaymentStatus,
    #[serde(default)]
    pub external_reference: Option<String>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Register a checkout preference and return its checkout URL
    async fn create_preference(
        &self,
        preference: &PaymentPreference,
    ) -> Result<CreatedPreference, PaymentError>;

    /// Look up a payment by id
    async fn get_payment(&self, payment_id: &str) -> Result<Payment, PaymentError>;
}

/// Provider ids show up both as JSON numbers and as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}
