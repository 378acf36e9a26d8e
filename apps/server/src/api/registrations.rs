use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch},
    Json, Router,
};
use serde::Deserialize;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{Ack, DataResponse},
};
use regdeck_core::registrations::{NewRegistration, Registration};

#[derive(Deserialize)]
pub struct CategoryQuery {
    category: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    status: String,
}

#[derive(Deserialize)]
pub struct RemarkUpdateRequest {
    /// Missing or null clears the remark.
    #[serde(default)]
    remark: Option<String>,
}

/// List registrations, newest first, optionally scoped by category.
async fn list_registrations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> ApiResult<Json<DataResponse<Vec<Registration>>>> {
    let registrations = state
        .registration_service
        .list(query.category.as_deref())
        .await?;
    Ok(Json(DataResponse::new(registrations)))
}

/// Create a registration from the public form.
async fn create_registration(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewRegistration>,
) -> ApiResult<Json<DataResponse<Registration>>> {
    let created = state.registration_service.create(req).await?;
    Ok(Json(DataResponse::new(created)))
}

/// Move a registration to a new status.
async fn update_status(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
    Json(req): Json<StatusUpdateRequest>,
) -> ApiResult<Json<DataResponse<Registration>>> {
    let updated = state
        .registration_service
        .set_status(id, &req.status)
        .await?;
    Ok(Json(DataResponse::new(updated)))
}

/// Replace the remark of a registration.
async fn update_remark(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
    Json(req): Json<RemarkUpdateRequest>,
) -> ApiResult<Json<DataResponse<Registration>>> {
    let updated = state
        .registration_service
        .set_remark(id, req.remark.as_deref().unwrap_or(""))
        .await?;
    Ok(Json(DataResponse::new(updated)))
}

async fn delete_registration(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Ack>> {
    state.registration_service.delete(id).await?;
    Ok(Json(Ack::ok()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/registrations",
            get(list_registrations).post(create_registration),
        )
        .route("/registrations/{id}", delete(delete_registration))
        .route("/registrations/{id}/status", patch(update_status))
        .route("/registrations/{id}/remark", patch(update_remark))
}
