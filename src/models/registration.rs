//! Registration submission types

use std::str::FromStr;

use serde::Serialize;

/// Participant role as submitted by the registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Trainer,
    Competitor,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role '{0}'")]
pub struct InvalidRole(pub String);

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "entrenador" => Ok(Role::Trainer),
            "competidor" => Ok(Role::Competitor),
            other => Err(InvalidRole(other.to_string())),
        }
    }
}

/// A validated registration submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub role: Role,
    pub boat_class: Option<String>,
    pub apply_discount: bool,
}
