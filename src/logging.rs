// SPDX-License-Identifier: MIT
//
// Logging setup.
//
// Stdout belongs to the raw-mode game, so all tracing output goes to a file.
// `RUST_LOG` filters it; without it only `info` and above are written.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber, truncating `path`.
///
/// # Errors
///
/// The log file can't be created.
pub fn init(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    build_subscriber(file, EnvFilter::try_from_default_env().ok()).init();
    Ok(())
}

/// A subscriber writing plain (no ANSI) lines to `file`.
pub fn build_subscriber(
    file: File,
    filter: Option<EnvFilter>,
) -> impl tracing::Subscriber + Send + Sync {
    let filter = filter.unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));
    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(file));

    tracing_subscriber::registry().with(fmt_layer).with(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn capture(filter: Option<EnvFilter>, emit: impl FnOnce()) -> String {
        let log = NamedTempFile::new().unwrap();
        let subscriber = build_subscriber(log.reopen().unwrap(), filter);
        tracing::subscriber::with_default(subscriber, emit);
        std::fs::read_to_string(log.path()).unwrap()
    }

    #[test]
    fn default_filter_keeps_info() {
        let contents = capture(None, || {
            tracing::info!("game started");
            tracing::debug!("noisy detail");
        });
        assert!(contents.contains("game started"));
        assert!(!contents.contains("noisy detail"));
        assert!(!contents.contains("\x1b["));
    }

    #[test]
    fn explicit_filter_is_honoured() {
        let contents = capture(Some(EnvFilter::new("debug")), || {
            tracing::debug!("noisy detail");
        });
        assert!(contents.contains("noisy detail"));
    }
}
