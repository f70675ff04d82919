//! Operator page and its JSON feeds (loopback only)

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};

use rollcall_core::RecentActivity;

use crate::{netif, AppState};

const OPERATOR_HTML: &str = include_str!("../ui/operator.html");
const OPERATOR_JS: &str = include_str!("../ui/operator.js");

/// GET /private
///
/// Serves the operator page
pub async fn serve_operator_page() -> Html<&'static str> {
    Html(OPERATOR_HTML)
}

/// GET /private/app.js
///
/// Serves the operator page JavaScript
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        OPERATOR_JS,
    )
        .into_response()
}

/// GET /private/interfaces
///
/// IPv4 addresses of the local interfaces, for picking the one the
/// check-in QR code should point at.
pub async fn list_interfaces() -> Json<Vec<netif::InterfaceAddress>> {
    Json(netif::ipv4_interfaces())
}

/// GET /private/get_last_submissions
///
/// Recent check-ins, newest first, at most ten.
pub async fn get_last_submissions(State(state): State<AppState>) -> Json<Vec<RecentActivity>> {
    Json(state.engine.recent_activity().await)
}
