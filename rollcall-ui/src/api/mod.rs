//! HTTP API handlers for rollcall-ui

pub mod attendance;
pub mod auth;
pub mod health;
pub mod operator;
pub mod qr;

pub use attendance::{serve_error, serve_form, serve_success, submit};
pub use auth::loopback_only;
pub use health::health_routes;
pub use operator::{get_last_submissions, list_interfaces, serve_operator_page};
pub use qr::generate_qr;
