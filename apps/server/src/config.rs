use std::{net::SocketAddr, time::Duration};

/// Which store backs durable state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Remote,
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub store: StoreBackend,
    pub db_path: String,
    pub script_url: Option<String>,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub debounce_window: Duration,
    pub static_dir: String,
    /// External base URL used for the registration link; falls back to the
    /// request's Host header when unset.
    pub public_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("REGDECK_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .expect("Invalid REGDECK_LISTEN_ADDR");
        let store = match std::env::var("REGDECK_STORE").as_deref() {
            Ok("remote") => StoreBackend::Remote,
            _ => StoreBackend::Sqlite,
        };
        let db_path =
            std::env::var("REGDECK_DB_PATH").unwrap_or_else(|_| "./data/registration.db".into());
        let script_url = std::env::var("REGDECK_SCRIPT_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let cors_allow = std::env::var("REGDECK_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("REGDECK_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let debounce_ms: u64 = std::env::var("REGDECK_DEBOUNCE_MS")
            .unwrap_or_else(|_| "500".into())
            .parse()
            .unwrap_or(500);
        let static_dir = std::env::var("REGDECK_STATIC_DIR").unwrap_or_else(|_| "public".into());
        let public_url = std::env::var("REGDECK_PUBLIC_URL")
            .ok()
            .map(|s| s.trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());
        Self {
            listen_addr,
            store,
            db_path,
            script_url,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            debounce_window: Duration::from_millis(debounce_ms),
            static_dir,
            public_url,
        }
    }
}
