use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_UPLOAD_MB: usize = 50;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Served publicly under `/uploads`.
    pub upload_dir: PathBuf,
    /// Holds the store file. Keep it outside `upload_dir`.
    pub data_dir: PathBuf,
    pub db_name: String,
    pub collection_name: String,
    pub max_upload_bytes: usize,
    pub expose_errors: bool,
    pub clean_on_start: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from("uploads"),
            data_dir: PathBuf::from("data"),
            db_name: "db.json".to_string(),
            collection_name: "images".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            expose_errors: false,
            clean_on_start: false,
        }
    }
}

impl AppConfig {
    /// Unset or blank variables keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let port = env_value("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(defaults.port);
        let max_upload_bytes = env_value("MAX_UPLOAD_MB")
            .and_then(|value| value.parse::<usize>().ok())
            .map(|mb| mb * 1024 * 1024)
            .unwrap_or(defaults.max_upload_bytes);
        let expose_errors = env_value("APP_ENV")
            .map(|value| value.eq_ignore_ascii_case("development"))
            .unwrap_or(false);
        let clean_on_start = env_value("CLEAN_UPLOADS_ON_START")
            .map(|value| parse_flag(&value))
            .unwrap_or(false);

        Self {
            host: env_value("BIND_HOST").unwrap_or(defaults.host),
            port,
            upload_dir: env_value("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            data_dir: env_value("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            db_name: env_value("DB_NAME").unwrap_or(defaults.db_name),
            collection_name: env_value("COLLECTION_NAME").unwrap_or(defaults.collection_name),
            max_upload_bytes,
            expose_errors,
            clean_on_start,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_name)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
