/// Server configuration
///
/// # Environment variables
///
/// Every field can be overridden from the environment:
///
/// | Variable | Default | Description |
/// |---------------------|---------------------|----------------------------------|
/// | WORK_DIR | /var/lib/pos | Working directory (db, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| production |
/// | LOG_LEVEL | info | tracing level filter |
/// | VAT_RATE | 0.10 | VAT rate for opted-in orders |
/// | BOGO_MAX_FREE_UNITS | 20 | Cap on Buy-X-Get-Y granted units |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/pos HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory, holds the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | production
    pub environment: String,
    /// Log level filter
    pub log_level: String,
    /// VAT rate applied when an order opts in
    pub vat_rate: f64,
    /// Upper bound on units granted by a single Buy-X-Get-Y application
    pub bogo_max_free_units: i64,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/pos".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            vat_rate: std::env::var("VAT_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.10),
            bogo_max_free_units: std::env::var("BOGO_MAX_FREE_UNITS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
        }
    }

    /// Override the parts tests usually care about
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Path of the SQLite database file under the working directory
    pub fn database_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("pos.db")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
