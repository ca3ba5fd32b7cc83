//! Event settings record
//!
//! The whole record is persisted as one JSON document and replaced wholesale
//! on every admin save. Missing keys fall back to defaults so older files keep
//! loading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOGO: &str = "static/images/Metropolitano.png";

/// Site-wide registration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logo: String,
    pub title_main: String,
    pub title_strong: String,
    /// Legacy stored amount; charges come from the class price alone
    pub base_price: i64,
    pub site_closed: bool,
    pub classes: Vec<BoatClass>,
    pub google_forms: GoogleForms,
    pub allow_cash_payments: bool,
    pub discount_enabled: bool,
    pub discount_percentage: i64,
    pub discount_description: String,
    /// Bumped on every save
    pub version: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            logo: DEFAULT_LOGO.to_string(),
            title_main: "Inscripciones".to_string(),
            title_strong: "Metropolitano".to_string(),
            base_price: 0,
            site_closed: false,
            classes: vec![],
            google_forms: GoogleForms::default(),
            allow_cash_payments: true,
            discount_enabled: false,
            discount_percentage: 0,
            discount_description: String::new(),
            version: 0,
            updated_at: None,
        }
    }
}

impl Settings {
    /// Find a class by name, ignoring case and surrounding whitespace
    pub fn find_class(&self, name: &str) -> Option<&BoatClass> {
        let wanted = name.trim();
        self.classes.iter().find(|c| c.matches(wanted))
    }

    /// Index of a class by name (case-insensitive)
    pub fn class_position(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.classes.iter().position(|c| c.matches(wanted))
    }

    /// Names of classes currently open for registration
    pub fn enabled_class_names(&self) -> Vec<String> {
        self.sorted_classes()
            .into_iter()
            .filter(|c| !c.closed)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Classes with open ones first, keeping the configured order otherwise
    pub fn sorted_classes(&self) -> Vec<&BoatClass> {
        let mut classes: Vec<&BoatClass> = self.classes.iter().collect();
        classes.sort_by_key(|c| c.closed);
        classes
    }

    /// Discount percentage limited to 0..=100
    pub fn effective_discount_percentage(&self) -> i64 {
        self.discount_percentage.clamp(0, 100)
    }
}

/// A race category with its own price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoatClass {
    pub name: String,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub price: Option<i64>,
    /// Derived at pricing time; never read back from disk
    #[serde(default, skip_deserializing)]
    pub discount_price: Option<i64>,
}

impl BoatClass {
    pub fn new(name: impl Into<String>, price: Option<i64>) -> Self {
        Self {
            name: name.into(),
            closed: false,
            price,
            discount_price: None,
        }
    }

    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    fn matches(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.to_lowercase()
    }
}

/// External form identifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleForms {
    /// Competitor follow-up form. Stored for the external form only.
    pub competitors_id: String,
    /// Form trainers are redirected to
    pub trainers_id: String,
    /// Prefill entry ids of the competitor form. Stored for the external
    /// form only.
    pub entry_id_num_operacion: String,
    pub entry_id_clase_barco: String,
}

impl Default for GoogleForms {
    fn default() -> Self {
        Self {
            competitors_id: "1FAIpQLSeA0tbwyKZ-u8zra-W6hlJL8TCTQOayqCpKwya3sON0ubS0nA".to_string(),
            trainers_id: "1FAIpQLSeZGar2xA3OR6SwNbKatSj1CLWQjRTmWyM0t-LOabpRWZYZ4g".to_string(),
            entry_id_num_operacion: "entry.1161481877".to_string(),
            entry_id_clase_barco: "entry.1553765108".to_string(),
        }
    }
}
