//! Tracing setup shared by the binaries: one fmt layer teed to stdout and the log file.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` when set; otherwise `info` with sqlx statement logging quieted.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"))
}

/// Installs the global subscriber, creating the log file (and its directory) if needed.
/// Load `.env` before calling this, otherwise `RUST_LOG` from the file is ignored.
pub fn init_tracing(log_file_path: &str) -> anyhow::Result<()> {
    let path = Path::new(log_file_path);
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", log_file_path))?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout.and(Arc::new(file)))
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_thread_ids(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("nested").join("quranbot.log");

        init_tracing(log_file.to_str().unwrap()).unwrap();
        tracing::info!(chat_id = 905, "logger test line");

        assert!(log_file.exists());
        assert!(init_tracing(log_file.to_str().unwrap()).is_err());
    }
}
