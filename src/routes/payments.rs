//! Payment provider return URLs and webhook

use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::payments::{process_notification, WebhookNotification};
use crate::pricing::responses::PaymentStatusResponse;
use crate::AppState;

pub const WEBHOOK_PATH: &str = "/mercadopago-webhook";

/// Query parameters the provider appends to the back-urls
#[derive(Debug, Default, Deserialize)]
pub struct PaymentReturnQuery {
    pub payment_id: Option<String>,
    pub status: Option<String>,
    pub collection_id: Option<String>,
    pub clase_barco: Option<String>,
}

fn log_return(outcome: &str, query: &PaymentReturnQuery) {
    info!(
        payment_id = ?query.payment_id,
        status = ?query.status,
        collection_id = ?query.collection_id,
        boat_class = ?query.clase_barco,
        "Provider {} redirect received", outcome
    );
}

pub async fn payment_success(Query(query): Query<PaymentReturnQuery>) -> Json<PaymentStatusResponse> {
    log_return("success", &query);
    Json(PaymentStatusResponse {
        status: "aprobado",
        message: "¡Tu pago fue procesado con Exito! Por favor, verifica tu correo o continua con los pasos adicionales.",
        payment_id: query.payment_id,
        clase_barco: query.clase_barco,
    })
}

pub async fn payment_pending(Query(query): Query<PaymentReturnQuery>) -> Json<PaymentStatusResponse> {
    log_return("pending", &query);
    Json(PaymentStatusResponse {
        status: "pendiente",
        message: "Tu pago está pendiente de aprobación. Por favor, revisa el estado de tu pago en Mercado Pago.",
        payment_id: query.payment_id,
        clase_barco: query.clase_barco,
    })
}

pub async fn payment_failure(Query(query): Query<PaymentReturnQuery>) -> Json<PaymentStatusResponse> {
    log_return("failure", &query);
    Json(PaymentStatusResponse {
        status: "fallido",
        message: "Tu pago no pudo ser procesado. Por favor, verifica tus datos o intenta con otro método de pago.",
        payment_id: query.payment_id,
        clase_barco: query.clase_barco,
    })
}

/// IPN-style notifications put topic and id in the query string
#[derive(Debug, Default, Deserialize)]
pub struct WebhookQuery {
    pub topic: Option<String>,
    pub id: Option<String>,
}

/// Provider notification endpoint. Always answers 200 so the provider does
/// not retry.
pub async fn webhook(
    State(state): State<AppState>,
    query: Option<Query<WebhookQuery>>,
    body: Bytes,
) -> Json<Value> {
    let mut notification = if body.is_empty() {
        WebhookNotification::default()
    } else {
        serde_json::from_slice::<WebhookNotification>(&body).unwrap_or_else(|e| {
            warn!("Unreadable webhook body: {}", e);
            WebhookNotification::default()
        })
    };

    if let Some(Query(query)) = query {
        if notification.topic().is_none() {
            notification.topic = query.topic;
        }
        if notification.resource_id().is_none() {
            notification.id = query.id;
        }
    }

    process_notification(state.payments.as_ref(), &notification).await;
    Json(json!({ "status": "ok" }))
}
