use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub mode: Mode,
    pub server: ServerConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

/// Deployment variant, resolved once at startup. Server mode relays to the
/// remote store and requires a bearer token on every data request; Local
/// mode runs against an in-process store and substitutes a default identity
/// when no token is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Local,
    Server,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Service-account token presented to the downstream store. Required in
    /// Server mode; the process refuses to start without it.
    pub service_account: Option<String>,
    pub base_url: String,
    pub storage_bucket: String,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some("production") | Some("prod") => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl Mode {
    fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some("local") => Mode::Local,
            _ => Mode::Server,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = Environment::from_env_value(env::var("APP_ENV").ok().as_deref());
        let mode = Mode::from_env_value(env::var("DOCRELAY_MODE").ok().as_deref());

        let port = env::var("DOCRELAY_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3000);

        Self {
            environment,
            mode,
            server: ServerConfig { port },
            store: StoreConfig {
                service_account: env::var("DOCRELAY_SERVICE_ACCOUNT").ok(),
                base_url: env::var("DOCRELAY_STORE_URL")
                    .unwrap_or_else(|_| "https://store.invalid".to_string()),
                storage_bucket: env::var("DOCRELAY_STORAGE_BUCKET")
                    .unwrap_or_else(|_| "default".to_string()),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
