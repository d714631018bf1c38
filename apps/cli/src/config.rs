use std::path::PathBuf;
use std::time::Duration;

use dairy_core::constants::{
    DEFAULT_CACHE_TTL, DEFAULT_DATA_DIR, DEFAULT_DOCUMENT_TITLE, DEFAULT_FETCH_DELAY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub sheet_name: String,
    pub credentials_json: Option<String>,
    pub credentials_file: PathBuf,
    pub cache_ttl: Duration,
    pub fetch_delay: Duration,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup("FARM_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".").join(DEFAULT_DATA_DIR));
        let sheet_name =
            lookup("FARM_SHEET_NAME").unwrap_or_else(|| DEFAULT_DOCUMENT_TITLE.to_string());
        let credentials_json = lookup("FARM_CREDENTIALS_JSON").filter(|s| !s.trim().is_empty());
        let credentials_file = lookup("FARM_CREDENTIALS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("credentials.json"));
        let cache_ttl = lookup("FARM_CACHE_TTL_SECS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CACHE_TTL);
        let fetch_delay = lookup("FARM_FETCH_DELAY_MS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_FETCH_DELAY);
        let log_format = match lookup("FARM_LOG_FORMAT") {
            Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        Self {
            data_dir,
            sheet_name,
            credentials_json,
            credentials_file,
            cache_ttl,
            fetch_delay,
            log_format,
        }
    }
}
