//! External registration forms

use crate::models::GoogleForms;

const FORMS_BASE: &str = "https://docs.google.com/forms/d/e";

/// Form that trainers fill in instead of paying
pub fn trainer_form_url(forms: &GoogleForms) -> String {
    format!("{}/{}/viewform?usp=pp_url", FORMS_BASE, forms.trainers_id)
}

/// Extract the form id from a full form URL, or return the input trimmed
/// when it already is a bare id.
///
/// Accepts `.../forms/d/e/<id>/viewform` style links as well as the shorter
/// `.../forms/d/<id>/edit` editor links.
pub fn extract_form_id(url_or_id: &str) -> String {
    let input = url_or_id.trim();
    for marker in ["/d/e/", "/d/"] {
        if let Some(start) = input.find(marker) {
            let id: String = input[start + marker.len()..]
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
                .collect();
            if !id.is_empty() {
                return id;
            }
        }
    }
    input.to_string()
}
