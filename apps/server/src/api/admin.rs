use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::Ack,
};
use regdeck_core::settings::{SettingKey, SettingValue};

#[derive(Deserialize, Default)]
pub struct ClearRequest {
    #[serde(default)]
    category: Option<String>,
}

#[derive(Deserialize)]
pub struct ExportQuery {
    category: Option<String>,
}

/// Remove every registration, or one category partition.
async fn clear_registrations(
    State(state): State<Arc<AppState>>,
    body: Option<Json<ClearRequest>>,
) -> ApiResult<Json<Ack>> {
    let req = body.map(|Json(b)| b).unwrap_or_default();
    state
        .registration_service
        .clear(req.category.as_deref())
        .await?;
    Ok(Json(Ack::ok()))
}

/// Filename-safe event name for the export download.
async fn export_filename(state: &AppState, category: Option<&str>, extension: &str) -> String {
    let key = SettingKey::EventName(category.map(str::to_string));
    let event_name = match state.settings_service.get(&key).await {
        Ok(Some(SettingValue::Text(name))) => name,
        _ => "event".to_string(),
    };
    let safe: String = event_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_{}.{}", safe, Utc::now().format("%Y-%m-%d"), extension)
}

fn attachment_headers(content_type: &str, filename: &str) -> ApiResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .map_err(|e| ApiError::Internal(e.to_string()))?,
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
            .map_err(|e| ApiError::Internal(e.to_string()))?,
    );
    Ok(headers)
}

/// Download the current list as CSV.
async fn export_csv(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<impl IntoResponse> {
    let registrations = state
        .registration_service
        .list(query.category.as_deref())
        .await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "ID",
            "Timestamp",
            "Name",
            "Phone",
            "Programme",
            "Category",
            "Status",
            "Remark",
            "Time In",
        ])
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    for r in &registrations {
        writer
            .write_record([
                r.id.to_string(),
                r.timestamp.to_rfc3339(),
                r.student_name.clone(),
                r.phone_number.clone(),
                r.programme.clone(),
                r.category.clone().unwrap_or_default(),
                r.status.clone(),
                r.remark.clone(),
                r.time_in.map(|t| t.to_rfc3339()).unwrap_or_default(),
            ])
            .map_err(|e| ApiError::Internal(e.to_string()))?;
    }
    let body = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let filename = export_filename(&state, query.category.as_deref(), "csv").await;
    let headers = attachment_headers("text/csv", &filename)?;
    Ok((headers, body))
}

/// Download the current list as JSON.
async fn export_json(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<impl IntoResponse> {
    let registrations = state
        .registration_service
        .list(query.category.as_deref())
        .await?;
    let body = serde_json::to_vec_pretty(&registrations)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let filename = export_filename(&state, query.category.as_deref(), "json").await;
    let headers = attachment_headers("application/json", &filename)?;
    Ok((headers, body))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/clear", post(clear_registrations))
        .route("/admin/export/csv", get(export_csv))
        .route("/admin/export/json", get(export_json))
}
