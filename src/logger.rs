//! Logger setup for the command line.

use log::LevelFilter;

use crate::driver::Verbosity;

impl Verbosity {
    /// Level used when `RUST_LOG` does not say otherwise.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Warn,
            Verbosity::Normal => LevelFilter::Info,
            Verbosity::Verbose => LevelFilter::Debug,
        }
    }
}

/// Installs `env_logger` at the level selected by `verbosity`.
///
/// `RUST_LOG` is applied on top, so `RUST_LOG=trace` still shows every
/// ignored file. Calling this twice is harmless.
///
/// # Arguments
///
/// * `verbosity` - Verbosity chosen on the command line.
pub fn init(verbosity: Verbosity) {
    let _ = env_logger::Builder::new()
        .filter_level(verbosity.level_filter())
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
