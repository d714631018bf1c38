use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use dairy_core::errors::Recovery;
use dairy_core::FarmStore;
use dairy_storage_json::JsonFileStore;
use dairy_storage_sheets::{
    GoogleSheetsClient, ServiceAccountCredentials, SheetsStore, SheetsStoreConfig,
    SpreadsheetClient,
};
use tracing_subscriber::{fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LogFormat};

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(tracing_fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

/// Which store was bound and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendMode {
    Remote,
    /// Credentials were found but the remote store could not be opened.
    LocalFallback {
        reason: String,
        service_account_email: Option<String>,
    },
    Local,
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendMode::Remote => write!(f, "remote spreadsheet"),
            BackendMode::LocalFallback {
                reason,
                service_account_email,
            } => {
                write!(f, "local files (remote unavailable: {})", reason)?;
                if let Some(email) = service_account_email {
                    write!(f, " [service account: {}]", email)?;
                }
                Ok(())
            }
            BackendMode::Local => write!(f, "local files"),
        }
    }
}

pub struct SelectedBackend {
    pub store: Arc<dyn FarmStore>,
    pub mode: BackendMode,
}

/// What credential discovery produced.
pub enum RemoteAccess {
    None,
    /// Credentials exist but are unusable.
    Invalid(String),
    Client(Arc<dyn SpreadsheetClient>),
}

/// Inline credentials first, then the credentials file.
pub fn discover_remote(config: &Config) -> RemoteAccess {
    let json = match &config.credentials_json {
        Some(json) => json.clone(),
        None if config.credentials_file.is_file() => {
            match std::fs::read_to_string(&config.credentials_file) {
                Ok(json) => json,
                Err(e) => {
                    return RemoteAccess::Invalid(format!(
                        "cannot read {}: {}",
                        config.credentials_file.display(),
                        e
                    ))
                }
            }
        }
        None => return RemoteAccess::None,
    };

    let client = ServiceAccountCredentials::from_json(&json).and_then(GoogleSheetsClient::new);
    match client {
        Ok(client) => RemoteAccess::Client(Arc::new(client)),
        Err(e) => RemoteAccess::Invalid(e.to_string()),
    }
}

pub async fn select_backend(config: &Config) -> anyhow::Result<SelectedBackend> {
    select_backend_with(config, discover_remote(config)).await
}

pub async fn select_backend_with(
    config: &Config,
    remote: RemoteAccess,
) -> anyhow::Result<SelectedBackend> {
    let mode = match remote {
        RemoteAccess::None => BackendMode::Local,
        RemoteAccess::Invalid(reason) => {
            tracing::warn!("Ignoring unusable credentials: {}", reason);
            BackendMode::LocalFallback {
                reason,
                service_account_email: None,
            }
        }
        RemoteAccess::Client(client) => {
            let email = client.identity().to_string();
            let sheets_config = SheetsStoreConfig {
                document_title: config.sheet_name.clone(),
                cache_ttl: config.cache_ttl,
                fetch_delay: config.fetch_delay,
                ..SheetsStoreConfig::default()
            };
            match SheetsStore::connect(client, sheets_config).await {
                Ok(store) => {
                    return Ok(SelectedBackend {
                        store: Arc::new(store),
                        mode: BackendMode::Remote,
                    })
                }
                Err(e) if e.recovery() == Recovery::SwitchBackend => {
                    tracing::warn!("Falling back to local files: {}", e);
                    BackendMode::LocalFallback {
                        reason: e.to_string(),
                        service_account_email: Some(email),
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
    };

    let store = JsonFileStore::new(&config.data_dir)
        .with_context(|| format!("opening local store at {}", config.data_dir.display()))?;
    Ok(SelectedBackend {
        store: Arc::new(store),
        mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dairy_storage_sheets::testing::InMemorySpreadsheet;
    use std::time::Duration;
    use tempfile::tempdir;

    fn config(dir: &std::path::Path) -> Config {
        Config {
            data_dir: dir.join("local_data"),
            sheet_name: "DairyManagerDB".to_string(),
            credentials_json: None,
            credentials_file: dir.join("credentials.json"),
            cache_ttl: Duration::from_secs(300),
            fetch_delay: Duration::ZERO,
            log_format: LogFormat::Text,
        }
    }

    #[tokio::test]
    async fn test_no_credentials_uses_local_files() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());

        let selected = select_backend(&config).await.unwrap();
        assert_eq!(selected.mode, BackendMode::Local);
        assert_eq!(selected.store.backend_name(), "local-json");
        assert!(config.data_dir.join("cows.json").exists());
    }

    #[tokio::test]
    async fn test_reachable_remote_is_used() {
        let dir = tempdir().unwrap();
        let remote = Arc::new(InMemorySpreadsheet::new());

        let selected = select_backend_with(&config(dir.path()), RemoteAccess::Client(remote))
            .await
            .unwrap();
        assert_eq!(selected.mode, BackendMode::Remote);
        assert_eq!(selected.store.backend_name(), "google-sheets");
    }

    #[tokio::test]
    async fn test_provisioning_failure_falls_back() {
        let dir = tempdir().unwrap();
        let remote = Arc::new(InMemorySpreadsheet::new().denying_create());

        let selected = select_backend_with(&config(dir.path()), RemoteAccess::Client(remote))
            .await
            .unwrap();
        match selected.mode {
            BackendMode::LocalFallback {
                service_account_email,
                ..
            } => assert_eq!(
                service_account_email.as_deref(),
                Some("farm-bot@example.iam.gserviceaccount.com")
            ),
            other => panic!("unexpected mode {:?}", other),
        }
        assert_eq!(selected.store.backend_name(), "local-json");
    }

    #[tokio::test]
    async fn test_malformed_credentials_file_falls_back() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        std::fs::write(&config.credentials_file, "{not json").unwrap();

        let selected = select_backend(&config).await.unwrap();
        assert!(matches!(selected.mode, BackendMode::LocalFallback { .. }));
    }
}
