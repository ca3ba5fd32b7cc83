//! Registration route handlers

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::models::RegistrationRequest;
use crate::pricing::requests::RegistrationForm;
use crate::pricing::responses::RegistrationPageResponse;
use crate::pricing::{plan_registration, RegistrationOutcome};
use crate::AppState;

/// Landing page: straight to the registration form unless closed
pub async fn index(State(state): State<AppState>) -> Result<Redirect> {
    if state.settings.load().await.site_closed {
        return Err(AppError::SiteClosed);
    }
    Ok(Redirect::to("/inscripciones"))
}

/// Registration form data
pub async fn form(State(state): State<AppState>) -> Result<Json<RegistrationPageResponse>> {
    let settings = state.settings.load().await;
    if settings.site_closed {
        return Err(AppError::SiteClosed);
    }
    Ok(Json(RegistrationPageResponse::from_settings(&settings)))
}

/// Registration submission.
///
/// Trainers are sent to their form; competitors are priced and sent to the
/// provider's checkout.
pub async fn process_inscription(
    State(state): State<AppState>,
    Form(form): Form<RegistrationForm>,
) -> Result<Response> {
    let settings = state.settings.load().await;
    if settings.site_closed {
        return Err(AppError::SiteClosed);
    }

    let request = RegistrationRequest::try_from(form).map_err(|e| {
        warn!("Registration rejected: {}", e);
        AppError::Validation("Error: Rol no válido seleccionado.".to_string())
    })?;

    let outcome = plan_registration(&request, &settings, &state.config.url_base).map_err(|e| {
        warn!(boat_class = ?request.boat_class, "Registration rejected: {}", e);
        AppError::from(e)
    })?;

    match outcome {
        RegistrationOutcome::TrainerForm { url } => {
            info!("Trainer registration, redirecting to {}", url);
            Ok(Redirect::to(&url).into_response())
        }
        RegistrationOutcome::Payment { quote, preference } => {
            info!(
                boat_class = %quote.class_name,
                discount_applied = quote.discount_applied,
                original = %quote.original_amount,
                price = %quote.amount,
                "Competitor priced"
            );

            let created = state.payments.create_preference(&preference).await?;
            info!(
                preference_id = %created.id,
                "Preference created, redirecting to {}", created.init_point
            );
            Ok(Redirect::to(&created.init_point).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::router;
    use crate::testing::{sample_settings, state_with, FakeGateway};

    fn submit(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/process_inscription")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_redirects_to_form() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(&dir, sample_settings(), Arc::default()).await;

        let response = router(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/inscripciones");
    }

    #[tokio::test]
    async fn test_form_lists_classes() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(&dir, sample_settings(), Arc::default()).await;

        let response = router(state)
            .oneshot(Request::builder().uri("/inscripciones").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(page["page_title"], "Inscripciones Metropolitano");
        assert_eq!(
            page["enabled_classes"],
            serde_json::json!(["Optimist Principiantes", "Tiny"])
        );
        assert_eq!(page["classes"][2]["name"], "Laser");
        assert_eq!(page["discount_enabled"], true);
    }

    #[tokio::test]
    async fn test_trainer_redirected_to_form() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(FakeGateway::default());
        let state = state_with(&dir, sample_settings(), gateway.clone()).await;

        let response = router(state).oneshot(submit("rol=entrenador")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("https://docs.google.com/forms/d/e/"));
        assert!(gateway.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_competitor_redirected_to_checkout() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(FakeGateway::default());
        let state = state_with(&dir, sample_settings(), gateway.clone()).await;

        let response = router(state)
            .oneshot(submit(
                "rol=competidor&clase_barco=Optimist+Principiantes&apply_discount=on",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://checkout.example.com/pref-1"
        );

        let created = gateway.created.lock().unwrap();
        let item = created[0].item().unwrap();
        assert_eq!(item.unit_price, dec!(63000));
        assert_eq!(item.title, "Inscripcion Competidor - Optimist Principiantes (Más de 150 km)");
        assert_eq!(
            created[0].back_urls.success,
            "https://inscripciones.example.com/payment_success?clase_barco=Optimist+Principiantes"
        );
        assert_eq!(created[0].external_reference, "METRO_Optimist Principiantes");
    }

    #[tokio::test]
    async fn test_closed_class_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(FakeGateway::default());
        let state = state_with(&dir, sample_settings(), gateway.clone()).await;

        let response = router(state)
            .oneshot(submit("rol=competidor&clase_barco=Laser"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("cerrada"));
        assert!(gateway.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_class_and_bad_role() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(&dir, sample_settings(), Arc::default()).await;
        let app = router(state);

        let response = app.clone().oneshot(submit("rol=competidor")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("selecciona tu clase"));

        let response = app.oneshot(submit("rol=juez")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("Rol no válido"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_generic_error() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(FakeGateway {
            fail: true,
            ..Default::default()
        });
        let state = state_with(&dir, sample_settings(), gateway).await;

        let response = router(state)
            .oneshot(submit("rol=competidor&clase_barco=Tiny"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let text = body_text(response).await;
        assert!(!text.contains("provider down"));
    }

    #[tokio::test]
    async fn test_closed_site_blocks_registration() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = sample_settings();
        settings.site_closed = true;
        let state = state_with(&dir, settings, Arc::default()).await;
        let app = router(state);

        for request in [
            submit("rol=entrenador"),
            Request::builder().uri("/inscripciones").body(Body::empty()).unwrap(),
            Request::builder().uri("/").body(Body::empty()).unwrap(),
        ] {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
            assert_eq!(body_text(response).await, "Inscripción cerrada");
        }
    }
}
