//! Process-wide tracing subscriber.
//!
//! Code logs through the `tracing` macros; this module only installs the
//! subscriber those macros write to. Installation happens at most once per
//! process. Output always goes to the console and, when configured, to a
//! rolling log file written by a background thread.

use std::path::Path;
use std::sync::OnceLock;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{LogConfig, LogFileConfig, LogFormat, LogRotation};

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Handle returned by [`init`].
///
/// Holds the file writer's worker guard; dropping the handle flushes pending
/// lines and stops file logging, so keep it alive for the life of the process.
#[must_use = "dropping the handle stops file logging"]
pub struct Telemetry {
    installed: bool,
    _file_guard: Option<WorkerGuard>,
}

impl Telemetry {
    /// Whether this call installed the global subscriber.
    pub fn installed(&self) -> bool {
        self.installed
    }
}

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG` takes precedence over `config.level`. A second call is a no-op
/// and reports `installed() == false`. Fails only if the log file cannot be
/// opened.
pub fn init(config: &LogConfig) -> anyhow::Result<Telemetry> {
    if is_initialized() {
        return Ok(Telemetry {
            installed: false,
            _file_guard: None,
        });
    }

    let (file_writer, file_guard) = match &config.file {
        Some(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(file)?);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let mut installed = false;
    INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| default_filter(&config.level));
        let console = match config.format {
            LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
            LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
        };
        let file = file_writer.map(|writer| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
        });
        // Another subscriber (e.g. a test harness) may already be global.
        installed = tracing_subscriber::registry()
            .with(filter)
            .with(console)
            .with(file)
            .try_init()
            .is_ok();
    });

    Ok(Telemetry {
        installed,
        _file_guard: file_guard.filter(|_| installed),
    })
}

/// Whether [`init`] has run in this process.
pub fn is_initialized() -> bool {
    INITIALIZED.get().is_some()
}

/// Open the rolling appender for `file`, creating its directory if needed.
///
/// The active file is `file.path`; rotated files carry a date suffix.
fn file_appender(file: &LogFileConfig) -> anyhow::Result<RollingFileAppender> {
    let name = file
        .path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("LOG_PATH '{}' has no file name", file.path.display()))?;
    let dir = match file.path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory '{}'", dir.display()))?;

    let mut builder = RollingFileAppender::builder()
        .rotation(rotation(file.rotation))
        .filename_prefix(name);
    if file.backup_count > 0 {
        // The limit includes the active file.
        builder = builder.max_log_files(file.backup_count + 1);
    }
    builder
        .build(dir)
        .with_context(|| format!("Failed to open log file '{}'", file.path.display()))
}

fn rotation(rotation: LogRotation) -> Rotation {
    match rotation {
        LogRotation::Minutely => Rotation::MINUTELY,
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Daily => Rotation::DAILY,
        LogRotation::Never => Rotation::NEVER,
    }
}

/// Application crates log at `level`; HTTP tracing at `debug`.
fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(format!(
        "stencil_api={level},stencil_db={level},tower_http=debug"
    ))
    .unwrap_or_else(|_| EnvFilter::new("info"))
}
