//! Thin facade over `slog` + `sloggers` that hands back a usable, structured
//! terminal logger for the process.

pub use slog::{debug, error, info, o, trace, warn, Logger};

use sloggers::terminal::{Destination, TerminalLoggerBuilder};
use sloggers::types::Severity;
use sloggers::Build;

/// Builds the root terminal logger for the process.
///
/// `verbose` bumps the minimum severity down to `trace`; otherwise `info` and up
/// are shown, keeping per-message protocol chatter out of normal operation.
pub fn init(verbose: bool) -> Logger {
    let mut builder = TerminalLoggerBuilder::new();
    builder.level(if verbose { Severity::Trace } else { Severity::Info });
    builder.destination(Destination::Stderr);

    builder.build().expect("failed to initialize terminal logger")
}
