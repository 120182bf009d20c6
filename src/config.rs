use serde::Deserialize;
use std::{env, fs, path::Path};
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:8080";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("invalid value for {name}: {reason}")]
    InvalidOverride { name: &'static str, reason: String },
}

/// Process-wide configuration, fixed at startup.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// The single origin allowed by the CORS policy.
    pub allowed_origin: String,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    /// Load configuration from the optional JSON file named by
    /// `VOLUMETRY_CONFIG`, then apply per-field environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an
    /// override value does not parse. Neither falls back silently.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var("VOLUMETRY_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        if let Ok(host) = env::var("VOLUMETRY_HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("VOLUMETRY_PORT") {
            config.port = port.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidOverride {
                    name: "VOLUMETRY_PORT",
                    reason: e.to_string(),
                }
            })?;
        }
        if let Ok(origin) = env::var("VOLUMETRY_ALLOWED_ORIGIN") {
            config.allowed_origin = origin;
        }
        if let Ok(max) = env::var("VOLUMETRY_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = max.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidOverride {
                    name: "VOLUMETRY_MAX_UPLOAD_BYTES",
                    reason: e.to_string(),
                }
            })?;
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
