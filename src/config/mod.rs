use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "./GeoLite2-City.mmdb";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub geoip: GeoIpConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub localization: LocalizationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoIpConfig {
    /// Path to the MaxMind City/Country .mmdb file
    pub db_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared signing secret; `None` disables signature checks
    #[serde(default)]
    pub api_key: Option<String>,
}

impl AuthConfig {
    pub fn enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizationConfig {
    /// Directory holding countries.json, regions.json and cities.json
    pub dir: PathBuf,
    /// Optional locale subdirectory of `dir`
    #[serde(default)]
    pub locale: Option<String>,
}

/// Command-line overrides; any `Some` wins over the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub db_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub api_key: Option<String>,
    pub localization_dir: Option<PathBuf>,
    pub locale: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let db_path = std::env::var("IPQUERY_DB_PATH")
            .unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());

        let host = std::env::var("IPQUERY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("IPQUERY_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("IPQUERY_PORT must be a valid port number")?;

        let api_key = non_empty(std::env::var("IPQUERY_API_KEY").ok());

        let localization_dir =
            std::env::var("IPQUERY_LOCALIZATION_DIR").unwrap_or_else(|_| ".".to_string());
        let locale = non_empty(std::env::var("IPQUERY_LOCALE").ok());

        Ok(Config {
            geoip: GeoIpConfig {
                db_path: PathBuf::from(db_path),
            },
            server: ServerConfig { host, port },
            auth: AuthConfig { api_key },
            localization: LocalizationConfig {
                dir: PathBuf::from(localization_dir),
                locale,
            },
        })
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(db_path) = overrides.db_path {
            self.geoip.db_path = db_path;
        }
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        // An explicit empty key on the command line turns auth off
        if let Some(api_key) = overrides.api_key {
            self.auth.api_key = non_empty(Some(api_key));
        }
        if let Some(dir) = overrides.localization_dir {
            self.localization.dir = dir;
        }
        if let Some(locale) = overrides.locale {
            self.localization.locale = non_empty(Some(locale));
        }
        self
    }
}
