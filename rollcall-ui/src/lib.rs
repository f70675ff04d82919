//! rollcall-ui library - HTTP service around the recording engine
//!
//! Serves the public check-in form and the loopback-only operator pages
//! (interface list, QR code, live feed) on a single port.

use std::sync::Arc;

use axum::Router;
use rollcall_core::RecordingEngine;

pub mod api;
pub mod config;
pub mod netif;

pub use config::Config;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Recording engine guarding the durable record table
    pub engine: Arc<RecordingEngine>,
    /// Service port, used when building check-in URLs for QR codes
    pub port: u16,
}

impl AppState {
    /// Create new application state
    pub fn new(engine: Arc<RecordingEngine>, port: u16) -> Self {
        Self { engine, port }
    }
}

/// Build application router
///
/// Operator routes are reachable from the local machine only; the check-in
/// form and result pages are public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Operator routes (same-machine trust check)
    let private = Router::new()
        .route("/private", get(api::operator::serve_operator_page))
        .route("/private/app.js", get(api::operator::serve_app_js))
        .route("/private/interfaces", get(api::operator::list_interfaces))
        .route("/private/generate_qr", post(api::qr::generate_qr))
        .route(
            "/private/get_last_submissions",
            get(api::operator::get_last_submissions),
        )
        .layer(middleware::from_fn(api::auth::loopback_only));

    // Public routes (no trust check)
    let public = Router::new()
        .route(
            "/public/attendance",
            get(api::attendance::serve_form).post(api::attendance::submit),
        )
        .route("/attendance_success", get(api::attendance::serve_success))
        .route("/attendance_error", get(api::attendance::serve_error))
        .merge(api::health::health_routes());

    // Combine routers
    Router::new()
        .merge(private)
        .merge(public)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
