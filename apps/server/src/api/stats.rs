use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState, models::DataResponse};
use regdeck_core::dashboard::{compute_stats, DashboardStats};

#[derive(Deserialize)]
pub struct StatsQuery {
    category: Option<String>,
}

/// Derived queue statistics over the current list, computed with the same
/// code dashboard sessions run locally.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<DataResponse<DashboardStats>>> {
    let registrations = state
        .registration_service
        .list(query.category.as_deref())
        .await?;
    let max_capacity = state.settings_service.max_capacity().await?;
    Ok(Json(DataResponse::new(compute_stats(
        &registrations,
        max_capacity,
    ))))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(get_stats))
}
