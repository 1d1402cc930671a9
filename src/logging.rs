// Conditional logging macros - only active in debug builds

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{}};
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        log::info!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{}};
}

/// Installs the `env_logger` backend.
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks `debug` over `warn`.
/// With `owns_terminal` logging is switched off entirely, since stderr output
/// would land on top of the alternate screen. Safe to call more than once.
pub fn init(verbose: bool, owns_terminal: bool) {
    let mut builder = if owns_terminal {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(log::LevelFilter::Off);
        builder
    } else {
        let default_filter = if verbose { "debug" } else { "warn" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
    };
    let _ = builder.format_timestamp_millis().try_init();
}
