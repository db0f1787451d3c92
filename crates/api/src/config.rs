use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use stencil_db::{PoolSettings, RetryPolicy};

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Tokio worker threads; `None` uses one per CPU.
    pub workers: Option<NonZeroUsize>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub cors: CorsConfig,
    pub log: LogConfig,
    pub database: DatabaseConfig,
}

/// Cross-origin policy. A list containing `*` allows anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub origins: Vec<String>,
    pub methods: Vec<String>,
    pub headers: Vec<String>,
    pub credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: vec!["*".into()],
            methods: vec!["*".into()],
            headers: vec!["*".into()],
            credentials: true,
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unknown log format '{other}', expected 'pretty' or 'json'"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
    /// Rolling log file written alongside the console. `None` logs to the
    /// console only.
    pub file: Option<LogFileConfig>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "debug".into(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

/// When the log file rolls over to a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Minutely,
    Hourly,
    Daily,
    Never,
}

impl FromStr for LogRotation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "M" | "MINUTELY" => Ok(Self::Minutely),
            "H" | "HOURLY" => Ok(Self::Hourly),
            "D" | "DAILY" | "MIDNIGHT" => Ok(Self::Daily),
            "NEVER" => Ok(Self::Never),
            other => anyhow::bail!(
                "unsupported log rotation '{other}', expected one of M, H, D, MIDNIGHT, NEVER"
            ),
        }
    }
}

/// Rolling file output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileConfig {
    /// Base file path; rotated files get a date suffix.
    pub path: PathBuf,
    pub rotation: LogRotation,
    /// Rotated files kept besides the active one. `0` keeps them all.
    pub backup_count: usize,
}

impl LogFileConfig {
    /// Build the file settings from raw `LOG_ROTATE_*` values.
    ///
    /// Rotation happens once per `when` unit; an interval other than 1 is
    /// rejected rather than silently ignored.
    pub fn new(
        path: impl Into<PathBuf>,
        when: &str,
        interval: u32,
        backup_count: usize,
    ) -> anyhow::Result<Self> {
        let rotation: LogRotation = when.parse()?;
        if interval != 1 && rotation != LogRotation::Never {
            anyhow::bail!("LOG_ROTATE_INTERVAL must be 1, got {interval}");
        }
        Ok(Self {
            path: path.into(),
            rotation,
            backup_count,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool: PoolSettings,
    pub retry: RetryPolicy,
    /// Apply embedded migrations at startup.
    pub auto_create_tables: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default   |
    /// |-----------------------------|-----------|
    /// | `HOST`                      | `0.0.0.0` |
    /// | `PORT`                      | `8080`    |
    /// | `WORKERS`                   | CPU count |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`      |
    /// | `CORS_ORIGINS`              | `*`       |
    /// | `CORS_METHODS`              | `*`       |
    /// | `CORS_HEADERS`              | `*`       |
    /// | `CORS_CREDENTIALS`          | `true`    |
    /// | `LOG_LEVEL`                 | `debug`   |
    /// | `LOG_FORMAT`                | `pretty`  |
    /// | `LOG_PATH`                  | unset     |
    /// | `LOG_ROTATE_WHEN`           | `D`       |
    /// | `LOG_ROTATE_INTERVAL`       | `1`       |
    /// | `LOG_BACKUP_COUNT`          | `180`     |
    /// | `DATABASE_URL`              | required  |
    /// | `POOL_SIZE`                 | `32`      |
    /// | `MAX_OVERFLOW`              | `64`      |
    /// | `POOL_ACQUIRE_TIMEOUT_SECS` | `30`      |
    /// | `SESSION_RETRIES`           | `3`       |
    /// | `SESSION_RETRY_DELAY_MS`    | `2000`    |
    /// | `AUTO_CREATE_TABLES`        | `true`    |
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = parse_var("PORT", 8080)?;
        let workers = match std::env::var("WORKERS") {
            Ok(raw) => Some(parse_workers(&raw)?),
            Err(_) => None,
        };
        let request_timeout_secs: u64 = parse_var("REQUEST_TIMEOUT_SECS", 30)?;

        let cors = CorsConfig {
            origins: list_var("CORS_ORIGINS"),
            methods: list_var("CORS_METHODS"),
            headers: list_var("CORS_HEADERS"),
            credentials: bool_var("CORS_CREDENTIALS", true),
        };

        let log = LogConfig {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".into()),
            format: parse_var("LOG_FORMAT", LogFormat::Pretty)?,
            file: log_file_from_env()?,
        };

        let defaults = PoolSettings::default();
        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            pool: PoolSettings {
                pool_size: parse_var("POOL_SIZE", defaults.pool_size)?,
                max_overflow: parse_var("MAX_OVERFLOW", defaults.max_overflow)?,
                acquire_timeout: Duration::from_secs(parse_var(
                    "POOL_ACQUIRE_TIMEOUT_SECS",
                    defaults.acquire_timeout.as_secs(),
                )?),
            },
            retry: RetryPolicy {
                attempts: parse_var("SESSION_RETRIES", RetryPolicy::default().attempts)?,
                delay: Duration::from_millis(parse_var("SESSION_RETRY_DELAY_MS", 2000)?),
            },
            auto_create_tables: bool_var("AUTO_CREATE_TABLES", true),
        };

        Ok(Self {
            host,
            port,
            workers,
            request_timeout_secs,
            cors,
            log,
            database,
        })
    }
}

/// Parse `key` into `T`, falling back to `default` when unset.
fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{key} has invalid value '{raw}': {e}")),
        Err(_) => Ok(default),
    }
}

/// Rolling file settings, present only when `LOG_PATH` is set.
fn log_file_from_env() -> anyhow::Result<Option<LogFileConfig>> {
    let path = match std::env::var("LOG_PATH") {
        Ok(path) if !path.trim().is_empty() => path,
        _ => return Ok(None),
    };
    let when = std::env::var("LOG_ROTATE_WHEN").unwrap_or_else(|_| "D".into());
    let interval: u32 = parse_var("LOG_ROTATE_INTERVAL", 1)?;
    let backup_count: usize = parse_var("LOG_BACKUP_COUNT", 180)?;
    LogFileConfig::new(path.trim(), &when, interval, backup_count).map(Some)
}

fn parse_workers(raw: &str) -> anyhow::Result<NonZeroUsize> {
    raw.trim()
        .parse::<NonZeroUsize>()
        .with_context(|| format!("WORKERS must be a positive integer, got '{raw}'"))
}

/// Comma-separated list, defaulting to `*`.
fn list_var(key: &str) -> Vec<String> {
    let raw = std::env::var(key).unwrap_or_else(|_| "*".into());
    split_list(&raw)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn bool_var(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(raw) => raw.trim().eq_ignore_ascii_case("true"),
        Err(_) => default,
    }
}
