//! Domain models

pub mod registration;
pub mod settings;

pub use registration::{InvalidRole, RegistrationRequest, Role};
pub use settings::{BoatClass, GoogleForms, Settings};
