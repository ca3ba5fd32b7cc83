//! Admin endpoints for editing the settings record
//!
//! All endpoints require `Authorization: Bearer <ADMIN_PASSWORD>` and are
//! disabled entirely when no admin password is configured.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{header::AUTHORIZATION, request::Parts},
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::forms::extract_form_id;
use crate::models::{BoatClass, Settings};
use crate::AppState;

/// Proof that the request carried the admin password
pub struct Admin;

#[async_trait]
impl FromRequestParts<AppState> for Admin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let expected = state
            .config
            .admin_password
            .as_deref()
            .ok_or(AppError::Unauthorized)?;

        let provided = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        match provided {
            Some(password) if password == expected => Ok(Admin),
            _ => {
                warn!(path = %parts.uri.path(), "Rejected admin request");
                Err(AppError::Unauthorized)
            }
        }
    }
}

/// Partial settings update; absent fields keep their current value
#[derive(Debug, Default, Deserialize)]
pub struct SettingsUpdate {
    pub title_main: Option<String>,
    pub title_strong: Option<String>,
    pub logo: Option<String>,
    pub base_price: Option<i64>,
    /// Form id or full form URL
    pub google_forms_competitors_id: Option<String>,
    /// Form id or full form URL
    pub google_forms_trainers_id: Option<String>,
    pub entry_id_num_operacion: Option<String>,
    pub entry_id_clase_barco: Option<String>,
    pub allow_cash_payments: Option<bool>,
    pub discount_enabled: Option<bool>,
    pub discount_percentage: Option<i64>,
    pub discount_description: Option<String>,
    /// Full replacement of the class list, in display order
    pub classes: Option<Vec<ClassUpdate>>,
    pub new_class: Option<NewClass>,
}

#[derive(Debug, Deserialize)]
pub struct ClassUpdate {
    pub name: String,
    pub open: bool,
    pub price: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct NewClass {
    pub name: String,
    pub price: Option<i64>,
}

impl SettingsUpdate {
    /// Validate and apply onto `settings`. Nothing is changed on error.
    pub fn apply(self, settings: &mut Settings) -> Result<()> {
        let mut next = settings.clone();

        if let Some(title) = self.title_main {
            next.title_main = title.trim().to_string();
        }
        if let Some(title) = self.title_strong {
            next.title_strong = title.trim().to_string();
        }
        if let Some(logo) = self.logo {
            next.logo = logo.trim().to_string();
        }
        if let Some(base_price) = self.base_price {
            if base_price < 0 {
                return Err(invalid("El precio base no puede ser negativo."));
            }
            next.base_price = base_price;
        }

        if let Some(id) = self.google_forms_competitors_id {
            next.google_forms.competitors_id = extract_form_id(&id);
        }
        if let Some(id) = self.google_forms_trainers_id {
            next.google_forms.trainers_id = extract_form_id(&id);
        }
        if let Some(entry) = self.entry_id_num_operacion {
            next.google_forms.entry_id_num_operacion = entry.trim().to_string();
        }
        if let Some(entry) = self.entry_id_clase_barco {
            next.google_forms.entry_id_clase_barco = entry.trim().to_string();
        }

        if let Some(allow) = self.allow_cash_payments {
            next.allow_cash_payments = allow;
        }
        if let Some(enabled) = self.discount_enabled {
            next.discount_enabled = enabled;
        }
        if let Some(pct) = self.discount_percentage {
            if !(0..=100).contains(&pct) {
                return Err(invalid("El porcentaje de descuento debe estar entre 0 y 100."));
            }
            next.discount_percentage = pct;
        }
        if let Some(description) = self.discount_description {
            next.discount_description = description.trim().to_string();
        }

        if let Some(classes) = self.classes {
            next.classes = classes
                .into_iter()
                .filter(|c| !c.name.trim().is_empty())
                .map(|c| BoatClass {
                    name: c.name.trim().to_string(),
                    closed: !c.open,
                    price: c.price,
                    discount_price: None,
                })
                .collect();
        }

        if let Some(new_class) = self.new_class {
            let name = new_class.name.trim();
            if !name.is_empty() {
                if next.find_class(name).is_some() {
                    info!("Class {} already exists, not adding it again", name);
                } else {
                    next.classes.push(BoatClass::new(name, new_class.price));
                }
            }
        }

        validate_classes(&next.classes)?;
        *settings = next;
        Ok(())
    }
}

fn validate_classes(classes: &[BoatClass]) -> Result<()> {
    let mut seen = HashSet::new();
    for class in classes {
        if !seen.insert(class.name.to_lowercase()) {
            return Err(invalid(&format!("La clase {} está repetida.", class.name)));
        }
        if class.price.is_some_and(|p| p < 0) {
            return Err(invalid(&format!(
                "El precio de la clase {} no puede ser negativo.",
                class.name
            )));
        }
    }
    Ok(())
}

fn invalid(message: &str) -> AppError {
    AppError::Validation(message.to_string())
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteAction {
    Open,
    Close,
}

#[derive(Debug, Deserialize)]
pub struct SiteStateRequest {
    pub action: SiteAction,
}

fn respond(settings: Arc<Settings>) -> Json<Settings> {
    Json(Settings::clone(&settings))
}

pub async fn get_settings(_admin: Admin, State(state): State<AppState>) -> Json<Settings> {
    respond(state.settings.load().await)
}

pub async fn update_settings(
    _admin: Admin,
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<Settings>> {
    let saved = state.settings.update(|s| update.apply(s)).await?;
    info!(version = saved.version, "Admin updated settings");
    Ok(respond(saved))
}

pub async fn delete_class(
    _admin: Admin,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Settings>> {
    let saved = state
        .settings
        .update(|s| {
            let index = s
                .class_position(&name)
                .ok_or_else(|| AppError::NotFound(format!("clase {}", name)))?;
            s.classes.remove(index);
            Ok::<_, AppError>(())
        })
        .await?;
    info!(class = %name, "Admin deleted class");
    Ok(respond(saved))
}

pub async fn set_site_state(
    _admin: Admin,
    State(state): State<AppState>,
    Json(request): Json<SiteStateRequest>,
) -> Result<Json<Settings>> {
    let saved = state
        .settings
        .update(|s| {
            s.site_closed = matches!(request.action, SiteAction::Close);
            Ok::<_, AppError>(())
        })
        .await?;
    if saved.site_closed {
        warn!("Registration closed by admin");
    } else {
        info!("Registration opened by admin");
    }
    Ok(respond(saved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router;
    use crate::testing::{sample_settings, state_with, ADMIN_PASSWORD};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn admin_request(method: &str, uri: &str, body: Option<&str>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_PASSWORD));
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn settings_body(response: axum::response::Response) -> Settings {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ==================== SettingsUpdate::apply tests ====================

    #[test]
    fn test_apply_full_update() {
        let mut settings = sample_settings();
        let update: SettingsUpdate = serde_json::from_str(
            r#"{
                "title_strong": "  Copa Primavera ",
                "google_forms_trainers_id": "https://docs.google.com/forms/d/e/TRAINERS_9/viewform",
                "google_forms_competitors_id": "https://docs.google.com/forms/d/COMP_4/edit",
                "entry_id_num_operacion": " entry.111 ",
                "entry_id_clase_barco": "entry.222",
                "discount_percentage": 15,
                "allow_cash_payments": false,
                "classes": [
                    {"name": "Optimist Principiantes", "open": false, "price": 72000},
                    {"name": "  ", "open": true, "price": 1},
                    {"name": "Laser", "open": true, "price": 90000}
                ],
                "new_class": {"name": "420", "price": 95000}
            }"#,
        )
        .unwrap();

        update.apply(&mut settings).unwrap();
        assert_eq!(settings.title_strong, "Copa Primavera");
        assert_eq!(settings.google_forms.trainers_id, "TRAINERS_9");
        assert_eq!(settings.google_forms.competitors_id, "COMP_4");
        assert_eq!(settings.google_forms.entry_id_num_operacion, "entry.111");
        assert_eq!(settings.google_forms.entry_id_clase_barco, "entry.222");
        assert_eq!(settings.discount_percentage, 15);
        assert!(!settings.allow_cash_payments);

        let names: Vec<&str> = settings.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Optimist Principiantes", "Laser", "420"]);
        assert!(settings.classes[0].closed);
        assert!(!settings.classes[1].closed);
        assert_eq!(settings.classes[2].price, Some(95000));
    }

    #[test]
    fn test_apply_existing_new_class_is_skipped() {
        let mut settings = sample_settings();
        let update = SettingsUpdate {
            new_class: Some(NewClass {
                name: "LASER".to_string(),
                price: Some(1),
            }),
            ..Default::default()
        };
        update.apply(&mut settings).unwrap();
        assert_eq!(settings.classes.len(), 3);
    }

    #[test]
    fn test_apply_rejects_invalid_input() {
        let original = sample_settings();

        let cases = vec![
            SettingsUpdate {
                discount_percentage: Some(101),
                ..Default::default()
            },
            SettingsUpdate {
                base_price: Some(-1),
                ..Default::default()
            },
            SettingsUpdate {
                classes: Some(vec![
                    ClassUpdate {
                        name: "Snipe".to_string(),
                        open: true,
                        price: Some(1),
                    },
                    ClassUpdate {
                        name: "snipe".to_string(),
                        open: true,
                        price: Some(2),
                    },
                ]),
                ..Default::default()
            },
            SettingsUpdate {
                title_main: Some("changed".to_string()),
                new_class: Some(NewClass {
                    name: "Cadet".to_string(),
                    price: Some(-5),
                }),
                ..Default::default()
            },
        ];

        for update in cases {
            let mut settings = original.clone();
            assert!(matches!(update.apply(&mut settings), Err(AppError::Validation(_))));
            assert_eq!(settings, original);
        }
    }

    // ==================== endpoint tests ====================

    #[tokio::test]
    async fn test_admin_requires_password() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(&dir, sample_settings(), Arc::default()).await;
        let app = router(state);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/admin/settings").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin/settings")
                    .header(header::AUTHORIZATION, "Bearer wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_settings_persists() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(&dir, sample_settings(), Arc::default()).await;
        let store = state.settings.clone();
        let app = router(state);

        let response = app
            .oneshot(admin_request(
                "PUT",
                "/admin/settings",
                Some(r#"{"discount_enabled": false, "new_class": {"name": "Snipe", "price": 60000}}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let saved = settings_body(response).await;
        assert!(!saved.discount_enabled);
        assert_eq!(saved.version, 2);

        let on_disk: Settings =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk.classes.last().unwrap().name, "Snipe");
    }

    #[tokio::test]
    async fn test_invalid_update_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(&dir, sample_settings(), Arc::default()).await;
        let app = router(state);

        let response = app
            .oneshot(admin_request(
                "PUT",
                "/admin/settings",
                Some(r#"{"discount_percentage": 250}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_class() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(&dir, sample_settings(), Arc::default()).await;
        let app = router(state);

        let response = app
            .clone()
            .oneshot(admin_request("DELETE", "/admin/classes/laser", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let saved = settings_body(response).await;
        assert!(saved.find_class("Laser").is_none());

        let response = app
            .oneshot(admin_request("DELETE", "/admin/classes/Finn", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_site_state_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(&dir, sample_settings(), Arc::default()).await;
        let app = router(state);

        let response = app
            .clone()
            .oneshot(admin_request("POST", "/admin/site_state", Some(r#"{"action": "close"}"#)))
            .await
            .unwrap();
        assert!(settings_body(response).await.site_closed);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/inscripciones").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Admin stays reachable while closed
        let response = app
            .clone()
            .oneshot(admin_request("POST", "/admin/site_state", Some(r#"{"action": "open"}"#)))
            .await
            .unwrap();
        assert!(!settings_body(response).await.site_closed);

        let response = app
            .oneshot(Request::builder().uri("/inscripciones").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
