//! Registration pricing services.
//!
//! Turns a registration submission and the current settings into either the
//! trainer form redirect or a priced payment preference.

use rust_decimal::Decimal;

use crate::forms;
use crate::models::{RegistrationRequest, Role, Settings};

use super::calculators::final_price;
use super::preference::{build_preference, PaymentPreference};

/// Result of pricing a competitor registration
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    /// Class name as configured (not as typed by the user)
    pub class_name: String,
    pub original_amount: Decimal,
    pub amount: Decimal,
    pub discount_applied: bool,
    pub discount_percentage: i64,
}

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("no boat class selected")]
    MissingClass,

    #[error("unknown boat class '{0}'")]
    UnknownClass(String),

    #[error("boat class '{0}' is closed")]
    ClosedClass(String),

    #[error("boat class '{0}' has no price configured")]
    Unpriced(String),
}

impl PricingError {
    /// Message shown to the participant
    pub fn user_message(&self) -> String {
        match self {
            PricingError::MissingClass | PricingError::UnknownClass(_) => {
                "Error: Por favor, selecciona tu clase de barco.".to_string()
            }
            PricingError::ClosedClass(_) => {
                "La inscripcion para esta clase esta cerrada. Por favor, selecciona una clase habilitada."
                    .to_string()
            }
            PricingError::Unpriced(_) => {
                "La clase seleccionada no tiene precio configurado. Por favor, contacta a la organización."
                    .to_string()
            }
        }
    }
}

/// Where a registration goes next
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationOutcome {
    /// Trainers fill in an external form; no payment
    TrainerForm { url: String },
    /// Competitors pay through the provider
    Payment {
        quote: PriceQuote,
        preference: PaymentPreference,
    },
}

/// Price a competitor registration.
///
/// The class must exist (case-insensitive), be open and have a price. The
/// discount applies only when enabled globally and requested by the
/// participant. The result is rounded to cents and never below 1.
pub fn compute_price(
    boat_class: Option<&str>,
    apply_discount: bool,
    settings: &Settings,
) -> Result<PriceQuote, PricingError> {
    let requested = boat_class
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(PricingError::MissingClass)?;

    let class = settings
        .find_class(requested)
        .ok_or_else(|| PricingError::UnknownClass(requested.to_string()))?;

    if class.closed {
        return Err(PricingError::ClosedClass(class.name.clone()));
    }

    let class_price = class
        .price
        .ok_or_else(|| PricingError::Unpriced(class.name.clone()))?;

    let original_amount = Decimal::from(class_price);
    let discount_applied = settings.discount_enabled && apply_discount;
    let discount_percentage = if discount_applied {
        settings.effective_discount_percentage()
    } else {
        0
    };
    let amount = final_price(original_amount, discount_applied.then_some(discount_percentage));

    Ok(PriceQuote {
        class_name: class.name.clone(),
        original_amount,
        amount,
        discount_applied,
        discount_percentage,
    })
}

/// Decide the next step for a registration submission.
pub fn plan_registration(
    request: &RegistrationRequest,
    settings: &Settings,
    url_base: &str,
) -> Result<RegistrationOutcome, PricingError> {
    match request.role {
        Role::Trainer => Ok(RegistrationOutcome::TrainerForm {
            url: forms::trainer_form_url(&settings.google_forms),
        }),
        Role::Competitor => {
            let quote = compute_price(
                request.boat_class.as_deref(),
                request.apply_discount,
                settings,
            )?;
            let preference = build_preference(&quote, settings, url_base);
            Ok(RegistrationOutcome::Payment { quote, preference })
        }
    }
}
