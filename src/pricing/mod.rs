//! Pricing & preference builder.
//!
//! Prices competitor registrations from the settings record and assembles the
//! checkout preference handed to the payment provider.

pub mod calculators;
pub mod preference;
pub mod requests;
pub mod responses;
pub mod services;

// Re-export commonly used items
pub use calculators::round_money;
pub use preference::{build_preference, PaymentPreference};
pub use services::{compute_price, plan_registration, PriceQuote, PricingError, RegistrationOutcome};
