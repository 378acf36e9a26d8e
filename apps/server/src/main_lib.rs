use std::sync::Arc;

use crate::{
    config::{Config, StoreBackend},
    events::{BroadcastEventSink, EventBus},
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use regdeck_core::{
    debounce::DebounceGuard,
    events::ChangeEventSink,
    registrations::{RegistrationRepositoryTrait, RegistrationService, RegistrationServiceTrait},
    settings::{SettingsRepositoryTrait, SettingsService, SettingsServiceTrait},
};
use regdeck_storage_remote::{RemoteStore, RemoteStoreConfig};
use regdeck_storage_sqlite::{
    db::{self, write_actor},
    registrations::RegistrationRepository,
    settings::SettingsRepository,
};

pub struct AppState {
    pub registration_service: Arc<dyn RegistrationServiceTrait>,
    pub settings_service: Arc<dyn SettingsServiceTrait>,
    /// Kept on the state so tests can reset suppression between cases.
    pub debounce: Arc<DebounceGuard>,
    pub event_bus: EventBus,
    pub public_url: Option<String>,
}

pub fn init_tracing() {
    let log_format = std::env::var("REGDECK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let (registration_repo, settings_repo): (
        Arc<dyn RegistrationRepositoryTrait>,
        Arc<dyn SettingsRepositoryTrait>,
    ) = match config.store {
        StoreBackend::Sqlite => {
            let db_path = db::init(&config.db_path)?;
            tracing::info!("Database path in use: {}", db_path);
            let pool = db::create_pool(&db_path)?;
            db::run_migrations(&pool)?;
            let writer = write_actor::spawn_writer((*pool).clone())?;
            (
                Arc::new(RegistrationRepository::new(pool.clone(), writer.clone())),
                Arc::new(SettingsRepository::new(pool, writer)),
            )
        }
        StoreBackend::Remote => {
            let script_url = config
                .script_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("REGDECK_SCRIPT_URL is required for the remote store"))?;
            tracing::info!("Proxying storage to scripting endpoint");
            let remote = Arc::new(RemoteStore::new(RemoteStoreConfig {
                script_url,
                request_timeout: config.request_timeout,
            })?);
            (remote.clone(), remote)
        }
    };

    let event_bus = EventBus::new(256);
    let sink: Arc<dyn ChangeEventSink> = Arc::new(BroadcastEventSink::new(event_bus.clone()));

    let settings_service = Arc::new(
        SettingsService::new(settings_repo).with_event_sink(sink.clone()),
    );
    settings_service.seed_defaults().await?;

    let debounce = Arc::new(DebounceGuard::new(config.debounce_window));
    let registration_service = Arc::new(
        RegistrationService::new(
            registration_repo,
            settings_service.clone(),
            debounce.clone(),
        )
        .with_event_sink(sink),
    );

    Ok(Arc::new(AppState {
        registration_service,
        settings_service,
        debounce,
        event_bus,
        public_url: config.public_url.clone(),
    }))
}
