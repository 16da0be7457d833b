//! Logging infrastructure for pinpod
//!
//! Logs go to `~/.local/state/pinpod/pinpod.log.<date>` (XDG state dir).
//! Analytics events mirrored on dev hosts use the `pinpod::analytics`
//! target, so `RUST_LOG=pinpod::analytics=info` isolates them.

use crate::config::{Config, LoggingConfig};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "pinpod.log";

/// Initialize logging into the state directory
pub fn init(config: &LoggingConfig) -> crate::error::Result<LoggingGuard> {
    init_in(&Config::state_dir(), config)
}

/// Initialize logging into `log_dir`
///
/// `RUST_LOG` wins over the configured level. If a global subscriber is
/// already installed it is kept and only the directory is prepared.
pub fn init_in(log_dir: &Path, config: &LoggingConfig) -> crate::error::Result<LoggingGuard> {
    std::fs::create_dir_all(log_dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            log_dir = %log_dir.display(),
            level = %config.level,
            "Logging initialized"
        );
    } else {
        tracing::debug!("global subscriber already set, keeping it");
    }

    Ok(LoggingGuard {
        _worker: guard,
        installed,
    })
}

/// Initialize logging for tests (test writer, pinpod at debug unless
/// `RUST_LOG` says otherwise)
pub fn init_test() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pinpod_core=debug,pinpod::analytics=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Keeps the background log writer alive; pending lines are flushed on drop
pub struct LoggingGuard {
    _worker: tracing_appender::non_blocking::WorkerGuard,
    installed: bool,
}

impl LoggingGuard {
    /// False when another subscriber already owned the process
    pub fn is_installed(&self) -> bool {
        self.installed
    }
}
