use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{Ack, DataResponse},
};
use regdeck_core::settings::{SettingKey, SettingsMap};

#[derive(Deserialize)]
pub struct SettingUpdateRequest {
    key: String,
    value: serde_json::Value,
}

/// Full settings map, typed values keyed by wire key.
async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DataResponse<SettingsMap>>> {
    let settings = state.settings_service.get_all().await?;
    Ok(Json(DataResponse::new(settings)))
}

/// Update one setting. The key must belong to the known schema and the
/// value must decode to that key's type.
async fn update_setting(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SettingUpdateRequest>,
) -> ApiResult<Json<Ack>> {
    let key = SettingKey::parse(&req.key)?;
    let value = key.decode_value(req.value)?;
    state.settings_service.update(key, value).await?;
    Ok(Json(Ack::ok()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/settings", get(get_settings).post(update_setting))
}
