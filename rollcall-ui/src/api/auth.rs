//! Same-machine trust check for operator routes
//!
//! The operator pages expose QR codes and the live check-in feed; they are
//! trusted to the machine the service runs on, nothing more.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

/// Reject requests whose peer address is not loopback.
///
/// Requires the server to be started with connect-info so the peer address
/// is available; a request without one is rejected too.
pub async fn loopback_only(request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    match peer {
        Some(ip) if ip.is_loopback() => next.run(request).await,
        Some(ip) => {
            warn!("Rejected operator request from {}", ip);
            StatusCode::FORBIDDEN.into_response()
        }
        None => StatusCode::FORBIDDEN.into_response(),
    }
}
