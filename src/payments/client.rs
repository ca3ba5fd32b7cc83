//! Mercado Pago REST client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use uuid::Uuid;

use crate::config::Config;
use crate::pricing::PaymentPreference;

use super::{CreatedPreference, Payment, PaymentError, PaymentGateway};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_ERROR_BODY: usize = 500;

/// Client for the Mercado Pago checkout and payments APIs
pub struct MercadoPagoClient {
    client: Client,
    api_url: String,
    access_token: String,
}

impl MercadoPagoClient {
    /// Create a client for `api_url` (no trailing slash)
    pub fn new(api_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self, PaymentError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            access_token: access_token.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, PaymentError> {
        Self::new(config.api_url.clone(), config.access_token.clone())
    }

    async fn rejected(response: reqwest::Response) -> PaymentError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        // Keep provider error bodies short in logs
        let body = if body.chars().count() > MAX_ERROR_BODY {
            format!("{}...", body.chars().take(MAX_ERROR_BODY).collect::<String>())
        } else {
            body
        };
        PaymentError::Rejected { status, body }
    }
}

#[async_trait]
impl PaymentGateway for MercadoPagoClient {
    async fn create_preference(
        &self,
        preference: &PaymentPreference,
    ) -> Result<CreatedPreference, PaymentError> {
        let url = format!("{}/checkout/preferences", self.api_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .header("X-Idempotency-Key", Uuid::new_v4().to_string())
            .json(preference)
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            return Err(Self::rejected(response).await);
        }

        response
            .json::<CreatedPreference>()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))
    }

    async fn get_payment(&self, payment_id: &str) -> Result<Payment, PaymentError> {
        if payment_id.is_empty() || !payment_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(PaymentError::InvalidResponse(format!(
                "invalid payment id '{}'",
                payment_id
            )));
        }

        let url = format!("{}/v1/payments/{}", self.api_url, payment_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(Self::rejected(response).await);
        }

        response
            .json::<Payment>()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))
    }
}
