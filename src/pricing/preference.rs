//! Payment preference payload.
//!
//! A preference is the provider-side record describing what the participant
//! pays and where the provider sends them afterwards. The field names follow
//! the provider's checkout API.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Settings;

use super::services::PriceQuote;

pub const CURRENCY: &str = "ARS";
pub const EXTERNAL_REFERENCE_PREFIX: &str = "METRO";
pub const COMPETITOR_ITEM_TITLE: &str = "Inscripcion Competidor";
pub const DEFAULT_DISCOUNT_LABEL: &str = "Descuento aplicado";

/// Checkout preference sent to the payment provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentPreference {
    pub items: Vec<PreferenceItem>,
    pub back_urls: BackUrls,
    pub auto_return: String,
    pub external_reference: String,
    pub payment_methods: PaymentMethods,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceItem {
    pub title: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub currency_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackUrls {
    pub success: String,
    pub pending: String,
    pub failure: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PaymentMethods {
    pub excluded_payment_types: Vec<PaymentTypeRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentTypeRef {
    pub id: String,
}

impl PaymentPreference {
    /// The single item being charged
    pub fn item(&self) -> Option<&PreferenceItem> {
        self.items.first()
    }
}

/// Build the checkout preference for a priced competitor registration.
///
/// `url_base` must not end with a slash.
pub fn build_preference(quote: &PriceQuote, settings: &Settings, url_base: &str) -> PaymentPreference {
    let mut title = format!("{} - {}", COMPETITOR_ITEM_TITLE, quote.class_name);
    if quote.discount_applied {
        let label = settings.discount_description.trim();
        let label = if label.is_empty() { DEFAULT_DISCOUNT_LABEL } else { label };
        title.push_str(&format!(" ({})", label));
    }

    let encoded_class = encode_query_value(&quote.class_name);
    let back_url = |outcome: &str| {
        format!("{}/payment_{}?clase_barco={}", url_base, outcome, encoded_class)
    };

    let mut excluded_payment_types = vec![];
    if !settings.allow_cash_payments {
        excluded_payment_types.push(PaymentTypeRef {
            id: "ticket".to_string(),
        });
    }

    PaymentPreference {
        items: vec![PreferenceItem {
            title,
            quantity: 1,
            unit_price: quote.amount,
            currency_id: CURRENCY.to_string(),
        }],
        back_urls: BackUrls {
            success: back_url("success"),
            pending: back_url("pending"),
            failure: back_url("failure"),
        },
        auto_return: "approved".to_string(),
        external_reference: external_reference(&quote.class_name),
        payment_methods: PaymentMethods {
            excluded_payment_types,
        },
    }
}

/// `METRO_<class>` reference used to match payments back to registrations
pub fn external_reference(class_name: &str) -> String {
    format!("{}_{}", EXTERNAL_REFERENCE_PREFIX, class_name)
}

/// Form-style encoding for a query value (spaces become `+`)
pub fn encode_query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
