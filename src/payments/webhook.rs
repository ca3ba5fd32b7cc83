//! Payment provider webhook processing
//!
//! Notifications only trigger a status lookup and logging, so processing the
//! same payment id more than once is harmless. Failures are logged and never
//! surfaced to the provider.

use serde::Deserialize;
use tracing::{error, info, warn};

use super::{opt_string_or_number, PaymentGateway, PaymentStatus};

/// Incoming notification body.
///
/// Older notifications carry `topic` + `id`; newer ones carry `type` +
/// `data.id`. Both shapes are accepted.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookNotification {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub data: Option<NotificationData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotificationData {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
}

impl WebhookNotification {
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref().or(self.kind.as_deref())
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or_else(|| self.data.as_ref().and_then(|d| d.id.as_deref()))
    }
}

/// What happened to a notification
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    /// Not a payment notification, or no id to look up
    Ignored,
    Processed {
        payment_id: String,
        status: PaymentStatus,
        external_reference: Option<String>,
    },
    Failed,
}

/// Look up the payment a notification refers to and record its status.
pub async fn process_notification(
    gateway: &dyn PaymentGateway,
    notification: &WebhookNotification,
) -> WebhookOutcome {
    let topic = notification.topic();
    let resource_id = notification.resource_id();
    info!(?topic, ?resource_id, "Webhook received");

    let resource_id = match (topic, resource_id) {
        (Some("payment"), Some(id)) => id,
        (Some("payment"), None) => {
            warn!("Payment webhook without resource id");
            return WebhookOutcome::Ignored;
        }
        _ => return WebhookOutcome::Ignored,
    };

    let payment = match gateway.get_payment(resource_id).await {
        Ok(payment) => payment,
        Err(e) => {
            error!("Failed to fetch payment {} from webhook: {}", resource_id, e);
            return WebhookOutcome::Failed;
        }
    };

    let reference = payment.external_reference.as_deref().unwrap_or("-");
    info!(
        payment_id = %payment.id,
        status = ?payment.status,
        external_reference = %reference,
        "Webhook payment details"
    );

    match payment.status {
        PaymentStatus::Approved => {
            info!("Payment {} APPROVED for {}", payment.id, reference)
        }
        PaymentStatus::Pending | PaymentStatus::InProcess | PaymentStatus::Authorized => {
            info!("Payment {} PENDING for {}", payment.id, reference)
        }
        PaymentStatus::Rejected | PaymentStatus::Cancelled => {
            info!("Payment {} REJECTED for {}", payment.id, reference)
        }
        other => info!("Payment {} in status {:?} for {}", payment.id, other, reference),
    }

    WebhookOutcome::Processed {
        payment_id: payment.id,
        status: payment.status,
        external_reference: payment.external_reference,
    }
}
