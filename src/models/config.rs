//! Runtime configuration of the catalog server.

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::media::normalizer::{DEFAULT_EFFORT, DEFAULT_QUALITY};

/// Configuration options of the catalog server.
///
/// Loaded from `config/default.yaml`, then `config/{APP_ENV}.yaml` when it
/// exists, then `APP_*` environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    pub database_url: String,
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the `images/` and `videos/` folders.
    pub media_root: PathBuf,
    /// Bearer token required by mutating endpoints.
    pub api_token: String,
    #[serde(default = "default_image_quality")]
    pub image_quality: f32,
    #[serde(default = "default_image_effort")]
    pub image_effort: u8,
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_image_quality() -> f32 {
    DEFAULT_QUALITY
}

fn default_image_effort() -> u8 {
    DEFAULT_EFFORT
}

impl ServerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());

        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }
}
