/// Engine configuration - knobs for the batch recompute process
///
/// # Environment variables
///
/// All knobs can be overridden through environment variables:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/backoffice/pricing | Working directory (database, logs) |
/// | RECOMPUTE_TIMEOUT_MS | 10000 | Per-item recompute timeout (ms) |
/// | BATCH_WORKERS | 4 | Bounded parallelism for batch sweeps |
/// | WRITE_RETRY_MAX | 3 | Transactional write retries before giving up |
/// | WRITE_RETRY_BACKOFF_MS | 50 | Base backoff between write retries (ms) |
/// | ENVIRONMENT | development | Runtime environment |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the embedded database
    pub work_dir: String,
    /// Per-item recompute timeout in milliseconds
    pub recompute_timeout_ms: u64,
    /// Bounded parallelism for batch sweeps
    pub batch_workers: usize,
    /// Transactional write retries before surfacing a write conflict
    pub write_retry_max: u32,
    /// Base backoff between write retries in milliseconds (doubles per attempt)
    pub write_retry_backoff_ms: u64,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/backoffice/pricing".into()),
            recompute_timeout_ms: std::env::var("RECOMPUTE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            batch_workers: std::env::var("BATCH_WORKERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
            write_retry_max: std::env::var("WRITE_RETRY_MAX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            write_retry_backoff_ms: std::env::var("WRITE_RETRY_BACKOFF_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the working directory and timeout
    ///
    /// Commonly used in tests.
    pub fn with_overrides(work_dir: impl Into<String>, recompute_timeout_ms: u64) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.recompute_timeout_ms = recompute_timeout_ms;
        config
    }

    /// Whether this is a production environment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
