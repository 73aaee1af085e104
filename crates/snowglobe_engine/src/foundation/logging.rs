//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging with a default filter (e.g. `"info"` or
/// `"snowglobe_engine=debug"`) that `RUST_LOG` still overrides
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_level(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}
