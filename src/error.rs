//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::payments::PaymentError;
use crate::pricing::PricingError;
use crate::store::SettingsError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    #[error("Registration is closed")]
    SiteClosed,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Payment provider error: {0}")]
    Payment(#[from] PaymentError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// Text shown to users when registration is closed.
pub const CLOSED_MESSAGE: &str = "Inscripción cerrada";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Pricing(e) => (StatusCode::BAD_REQUEST, e.user_message()),
            AppError::SiteClosed => (StatusCode::FORBIDDEN, CLOSED_MESSAGE.to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "No autorizado".to_string()),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("No encontrado: {}", what)),
            AppError::Payment(e) => {
                tracing::error!("Payment provider error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Hubo un error al procesar el pago. Por favor, inténtalo de nuevo más tarde."
                        .to_string(),
                )
            }
            AppError::Settings(e) => {
                tracing::error!("Settings error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error interno".to_string())
            }
        };

        (status, message).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
