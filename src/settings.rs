//! Layered configuration: defaults, an optional TOML file, `CITYSEARCH__*`
//! environment variables and finally `PORT`.

use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_CONFIG_FILE: &str = "citysearch";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub search: SearchSettings,
    pub uploads: UploadSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    pub result_cap: usize,
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    pub per_minute: u32,
    pub max_bytes: usize,
}

impl Settings {
    /// Loads settings. With no explicit path, `citysearch.toml` in the working
    /// directory is read when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let settings = Self::builder()?
            .add_source(file)
            .add_source(Environment::with_prefix("CITYSEARCH").separator("__"))
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Built-in defaults only.
    pub fn defaults() -> Result<Self> {
        Ok(Self::builder()?.build()?.try_deserialize()?)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 4000_i64)?
            .set_default("search.result_cap", 50_i64)?
            .set_default("search.cache_capacity", 256_i64)?
            .set_default("uploads.per_minute", 5_i64)?
            .set_default("uploads.max_bytes", 256_i64 * 1024 * 1024)?)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
