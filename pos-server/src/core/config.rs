/// Server configuration
///
/// # Environment variables
///
/// All fields can be overridden through the environment:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/pos | Working directory (database, logs) |
/// | DATABASE_PATH | <WORK_DIR>/pos.db | SQLite database file |
/// | LOG_LEVEL | info | Tracing filter level |
/// | ENVIRONMENT | development | Runtime environment |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/pos LOG_LEVEL=debug cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database and log files
    pub work_dir: String,
    /// SQLite database path
    pub database_path: String,
    /// Tracing filter level
    pub log_level: String,
    /// development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, using defaults for
    /// anything unset
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/pos".into());
        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| format!("{}/pos.db", work_dir));
        Self {
            work_dir,
            database_path,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
