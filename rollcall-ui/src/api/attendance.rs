//! Public check-in endpoints
//!
//! The form posts a student ID; the origin address comes from the
//! connection, the client signature from the User-Agent header, and the
//! timestamp from the local clock. Outcomes map to redirects onto the
//! result pages.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Query, State},
    http::{header::USER_AGENT, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::Local;
use serde::Deserialize;
use tracing::error;

use rollcall_core::{Error, RecordOutcome, Submission};

use crate::AppState;

const FORM_HTML: &str = include_str!("../ui/attendance_form.html");
const SUCCESS_HTML: &str = include_str!("../ui/attendance_success.html");
const ERROR_HTML: &str = include_str!("../ui/attendance_error.html");

/// Submission timestamp format, matching the record table contents
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Check-in form fields
#[derive(Debug, Deserialize)]
pub struct AttendanceForm {
    pub student_id: String,
}

/// GET /public/attendance
///
/// Serves the check-in form
pub async fn serve_form() -> Html<&'static str> {
    Html(FORM_HTML)
}

/// POST /public/attendance
pub async fn submit(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Form(form): Form<AttendanceForm>,
) -> Response {
    let client_signature = headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let submission = Submission {
        identifier: form.student_id,
        timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        origin_address: peer.ip().to_string(),
        client_signature,
    };

    match state.engine.record(submission).await {
        Ok(RecordOutcome::Recorded) => Redirect::to("/attendance_success").into_response(),
        Ok(RecordOutcome::Duplicate) => {
            Redirect::to("/attendance_error?error=duplicate").into_response()
        }
        Ok(RecordOutcome::SubjectNotFound) => {
            Redirect::to("/attendance_error?error=not_found").into_response()
        }
        Err(Error::Busy) => Redirect::to("/attendance_error?error=busy").into_response(),
        Err(e) => {
            error!("Failed to record submission: {}", e);
            Redirect::to("/attendance_error?error=unknown").into_response()
        }
    }
}

/// GET /attendance_success
pub async fn serve_success() -> Html<&'static str> {
    Html(SUCCESS_HTML)
}

/// Query parameters for the error page
#[derive(Debug, Deserialize)]
pub struct ErrorQuery {
    pub error: Option<String>,
}

/// GET /attendance_error
///
/// Picks the user-facing message from the `error` query parameter.
pub async fn serve_error(Query(query): Query<ErrorQuery>) -> Html<String> {
    let message = match query.error.as_deref() {
        Some("duplicate") => {
            "Your attendance has been recorded, but it appears to be a duplicate submission."
        }
        Some("not_found") => "Student ID not found. Please check your ID and try again.",
        Some("busy") => "The system is busy right now. Please try again in a moment.",
        _ => "An unknown error occurred. Please try again later.",
    };
    Html(ERROR_HTML.replace("{{message}}", message))
}
