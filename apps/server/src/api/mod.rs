use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, main_lib::AppState};

mod admin;
mod events;
mod qrcode;
mod registrations;
mod settings;
mod stats;

async fn healthz() -> &'static str {
    "ok"
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<axum::http::HeaderValue> = config
            .cors_allow
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    };

    let api = Router::new()
        .route("/healthz", get(healthz))
        .merge(registrations::router())
        .merge(settings::router())
        .merge(admin::router())
        .merge(stats::router())
        .merge(qrcode::router())
        // Store calls are bounded; a hung backend answers with a timeout
        // instead of wedging the connection.
        .layer(TimeoutLayer::new(config.request_timeout))
        // The event stream stays open indefinitely, so it sits outside the
        // timeout layer.
        .merge(events::router());

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
