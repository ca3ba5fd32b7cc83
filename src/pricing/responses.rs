//! Response DTOs for the registration pages.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Settings;

use super::calculators::final_price;

/// One class as shown on the registration form
#[derive(Debug, Clone, Serialize)]
pub struct ClassSummary {
    pub name: String,
    pub closed: bool,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub price: Option<Decimal>,
    /// Price after the global discount, when one is enabled
    #[serde(with = "rust_decimal::serde::str_option")]
    pub discount_price: Option<Decimal>,
}

/// Data backing the registration form
#[derive(Debug, Serialize)]
pub struct RegistrationPageResponse {
    pub page_title: String,
    pub logo_path: String,
    pub title_main: String,
    pub title_strong: String,
    pub classes: Vec<ClassSummary>,
    pub enabled_classes: Vec<String>,
    pub discount_enabled: bool,
    pub discount_description: String,
}

impl RegistrationPageResponse {
    pub fn from_settings(settings: &Settings) -> Self {
        let discount = settings
            .discount_enabled
            .then(|| settings.effective_discount_percentage());

        let classes = settings
            .sorted_classes()
            .into_iter()
            .map(|c| {
                let price = c.price.map(Decimal::from);
                ClassSummary {
                    name: c.name.clone(),
                    closed: c.closed,
                    price,
                    discount_price: discount.and_then(|pct| price.map(|p| final_price(p, Some(pct)))),
                }
            })
            .collect();

        Self {
            page_title: format!("{} {}", settings.title_main, settings.title_strong),
            logo_path: settings.logo.clone(),
            title_main: settings.title_main.clone(),
            title_strong: settings.title_strong.clone(),
            classes,
            enabled_classes: settings.enabled_class_names(),
            discount_enabled: settings.discount_enabled,
            discount_description: settings.discount_description.clone(),
        }
    }
}

/// Landing data for the provider's return URLs
#[derive(Debug, Serialize)]
pub struct PaymentStatusResponse {
    pub status: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clase_barco: Option<String>,
}
