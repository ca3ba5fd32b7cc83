//! Request DTOs for the registration form.

use serde::Deserialize;

use crate::models::{InvalidRole, RegistrationRequest, Role};

/// Raw registration form fields
#[derive(Debug, Default, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub rol: Option<String>,
    #[serde(default)]
    pub clase_barco: Option<String>,
    #[serde(default)]
    pub apply_discount: Option<String>,
    /// Older forms call the discount checkbox "more than 150 km away"
    #[serde(default)]
    pub mas_150km: Option<String>,
}

impl TryFrom<RegistrationForm> for RegistrationRequest {
    type Error = InvalidRole;

    fn try_from(form: RegistrationForm) -> Result<Self, Self::Error> {
        let role: Role = form.rol.as_deref().unwrap_or_default().parse()?;
        let apply_discount = is_checked(&form.apply_discount) || is_checked(&form.mas_150km);

        Ok(RegistrationRequest {
            role,
            boat_class: form.clase_barco.filter(|c| !c.trim().is_empty()),
            apply_discount,
        })
    }
}

fn is_checked(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some("on" | "true" | "1"))
}
