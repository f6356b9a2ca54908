//! Helpers shared by the `logo-forge` and `logo-paint` binaries.
//!
//! Only compiled with the `cli` feature (on by default).

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::error::Error;

/// Log targets enabled by default: the library and both binaries.
const LOG_TARGETS: [&str; 2] = ["logo_forge", "logo_paint"];

/// Builds the filter used when `RUST_LOG` is unset.
///
/// Each `-v` raises the level from `info` to `debug` and then `trace`.
pub fn default_directive(verbose: u8) -> String {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs the `fmt` subscriber. `RUST_LOG` wins when set.
pub fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Exit status for a run that had per-target failures.
pub const EXIT_PARTIAL: u8 = 1;
/// Exit status for invalid arguments, matching clap's usage errors.
pub const EXIT_USAGE: u8 = 2;
/// Exit status for a missing external program.
pub const EXIT_MISSING_DEPENDENCY: u8 = 3;

/// Exit status for any other fatal error.
pub const EXIT_FAILURE: u8 = 1;

/// Picks the exit status for a fatal error.
pub fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<Error>() {
        Some(Error::MissingDependency { .. }) => EXIT_MISSING_DEPENDENCY,
        Some(Error::InvalidArgument(_)) => EXIT_USAGE,
        _ => EXIT_FAILURE,
    }
}

/// Reports a fatal error on stderr and returns its exit status.
pub fn fail(err: &anyhow::Error) -> ExitCode {
    eprintln!("error: {err:#}");
    let status = exit_status(err);
    if status == EXIT_MISSING_DEPENDENCY {
        eprintln!("hint: install the missing tool, or pass `--backend builtin` to render without it");
    }
    ExitCode::from(status)
}
