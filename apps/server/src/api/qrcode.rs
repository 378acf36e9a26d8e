use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use qrcode::render::svg;
use qrcode::QrCode;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::DataResponse,
};

#[derive(Deserialize)]
pub struct QrQuery {
    category: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeResponse {
    /// SVG image as a data URL, ready for an <img> tag.
    pub qr_code: String,
    pub url: String,
}

/// Base URL for the registration link: the configured public URL, or the
/// request's forwarded host.
fn base_url(state: &AppState, headers: &HeaderMap) -> Option<String> {
    if let Some(configured) = &state.public_url {
        return Some(configured.clone());
    }
    let host = headers
        .get("x-forwarded-host")
        .or_else(|| headers.get(axum::http::header::HOST))?
        .to_str()
        .ok()?;
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    Some(format!("{proto}://{host}"))
}

/// QR code pointing at the registration form, scoped by category.
async fn get_qrcode(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QrQuery>,
    headers: HeaderMap,
) -> ApiResult<Json<DataResponse<QrCodeResponse>>> {
    let base = base_url(&state, &headers)
        .ok_or_else(|| ApiError::BadRequest("cannot determine public URL".into()))?;
    let url = match query.category.as_deref() {
        Some(category) => format!("{base}/register.html?category={category}"),
        None => format!("{base}/register.html"),
    };

    let code = QrCode::new(url.as_bytes()).map_err(|e| ApiError::Internal(e.to_string()))?;
    let image = code
        .render::<svg::Color>()
        .min_dimensions(300, 300)
        .build();
    let qr_code = format!("data:image/svg+xml;base64,{}", BASE64.encode(image));

    Ok(Json(DataResponse::new(QrCodeResponse { qr_code, url })))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/qrcode", get(get_qrcode))
}
