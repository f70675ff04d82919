//! QR code generation for check-in URLs

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use qrcode::{render::svg, QrCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::AppState;

/// Request body: the interface address the code should point at
#[derive(Debug, Deserialize)]
pub struct QrRequest {
    pub ip: String,
}

/// Response: the check-in URL and a base64-encoded SVG rendering of it
#[derive(Debug, Serialize)]
pub struct QrResponse {
    pub qr_code: String,
    pub full_url: String,
}

/// POST /private/generate_qr
pub async fn generate_qr(
    State(state): State<AppState>,
    Json(request): Json<QrRequest>,
) -> Result<Json<QrResponse>, QrError> {
    let full_url = format!("http://{}:{}/public/attendance", request.ip, state.port);

    let code = QrCode::new(full_url.as_bytes()).map_err(|e| QrError::Encoding(e.to_string()))?;
    let image = code.render::<svg::Color>().min_dimensions(240, 240).build();

    Ok(Json(QrResponse {
        qr_code: BASE64.encode(image.as_bytes()),
        full_url,
    }))
}

/// QR API errors
#[derive(Debug)]
pub enum QrError {
    Encoding(String),
}

impl IntoResponse for QrError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            QrError::Encoding(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("QR encoding error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
