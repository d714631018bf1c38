use std::time::Duration;

/// Default directory for the file-backed store
pub const DEFAULT_DATA_DIR: &str = "local_data";

/// Default title of the remote spreadsheet document
pub const DEFAULT_DOCUMENT_TITLE: &str = "DairyManagerDB";

/// How long a fetched worksheet stays valid in the read cache
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Delay before every uncached remote fetch
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(1000);

/// Date format used by every persisted date field
pub const DATE_FORMAT: &str = "%Y-%m-%d";
