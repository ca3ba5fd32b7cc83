//! HTTP routes

pub mod admin;
pub mod health;
pub mod payments;
pub mod registration;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::debug;

use crate::error::AppError;
use crate::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(registration::index))
        .route("/inscripciones", get(registration::form))
        .route("/process_inscription", post(registration::process_inscription))
        .route("/payment_success", get(payments::payment_success))
        .route("/payment_pending", get(payments::payment_pending))
        .route("/payment_failure", get(payments::payment_failure))
        .route(payments::WEBHOOK_PATH, post(payments::webhook))
        .route(
            "/admin/settings",
            get(admin::get_settings).put(admin::update_settings),
        )
        .route("/admin/classes/:name", delete(admin::delete_class))
        .route("/admin/site_state", post(admin::set_site_state))
        .route("/health", get(health::health))
        .nest_service("/static", static_files)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(state.clone(), site_closed_gate)),
        )
        .with_state(state)
}

/// Paths that stay reachable while registration is closed
fn bypasses_gate(path: &str) -> bool {
    path == "/"
        || path == "/health"
        || path == payments::WEBHOOK_PATH
        || path == "/admin"
        || path.starts_with("/admin/")
        || path.starts_with("/static/")
}

async fn site_closed_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !bypasses_gate(request.uri().path()) && state.settings.load().await.site_closed {
        debug!(path = %request.uri().path(), "Registration closed, request blocked");
        return AppError::SiteClosed.into_response();
    }
    next.run(request).await
}
