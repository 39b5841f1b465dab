// ============================================================================
// videocrop-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: env_logger initialization for the CLI
//
// Log records always go to stderr; stdout carries nothing but the JSON
// result (or the usage/error line), so the output stays machine readable.
//
// USAGE:
// - default: warnings and errors only
// - --verbose: debug output, including the sampled positions
// - RUST_LOG=<filter>: overrides both of the above

use log::LevelFilter;
use std::io::Write;

/// Default level when neither `--verbose` nor `RUST_LOG` is given.
const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

/// Picks the log level for the given verbosity flag.
#[must_use]
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        DEFAULT_LEVEL
    }
}

/// Initializes the global logger.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(verbose: bool) {
    let level = level_for(verbose);

    let mut builder = env_logger::Builder::new();
    builder
        .format(|buf, record| {
            let level_str = match record.level() {
                log::Level::Error => "ERROR",
                log::Level::Warn => "WARN ",
                log::Level::Info => "INFO ",
                log::Level::Debug => "DEBUG",
                log::Level::Trace => "TRACE",
            };
            writeln!(buf, "{} {} {}", buf.timestamp(), level_str, record.args())
        })
        .target(env_logger::Target::Stderr)
        .filter(None, level);

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    if builder.try_init().is_ok() {
        log::debug!("Logger initialized with level: {}", level);
    }
}
