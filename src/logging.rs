//! Logging setup and user facing error output for the command line tools.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::form::capitalise_first_char;

/// The log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Install a `tracing` subscriber that writes to stderr.
///
/// The level is read from the `RUST_LOG` environment variable and falls back
/// to [DEFAULT_LOG_FILTER]. Output goes to stderr so that it never mixes with
/// command output on stdout.
pub fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(filter))
        .init();
}

/// Print `error` to stderr in bold red with its first letter capitalised.
pub fn print_error(error: impl ToString) {
    eprintln!("{}", error_text(&error.to_string()))
}

fn error_text(error: &str) -> String {
    format!("\x1b[31;1m{}\x1b[0m", capitalise_first_char(error))
}
