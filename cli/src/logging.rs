//! Logger initialisation.

use log::LevelFilter;

/// Map `-v`/`-q` flags to the default log level.
///
/// # Examples
///
/// ```
/// use connect_packager_cli::logging::level_filter;
/// use log::LevelFilter;
///
/// assert_eq!(level_filter(0, false), LevelFilter::Warn);
/// assert_eq!(level_filter(2, false), LevelFilter::Debug);
/// assert_eq!(level_filter(0, true), LevelFilter::Error);
/// ```
#[must_use]
pub const fn level_filter(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install `env_logger` with a default level from the flags.
///
/// `RUST_LOG` overrides the default. Timestamps and targets are only shown
/// at debug level and above.
pub fn init(verbose: u8, quiet: bool) {
    let level = level_filter(verbose, quiet);
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()));

    if level <= LevelFilter::Info {
        builder.format_timestamp(None).format_target(false);
    }

    if builder.try_init().is_err() {
        // A logger is already installed; keep it.
    }
}
