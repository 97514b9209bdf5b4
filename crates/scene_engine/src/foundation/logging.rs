//! Logging utilities
//!
//! The engine logs through the `log` facade; binaries pick the backend.
//! These helpers wire up `env_logger`, honoring `RUST_LOG` when it is set.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging with `default_level` used when `RUST_LOG` is unset.
///
/// Calling this twice is harmless; the second call is ignored with a warning.
pub fn init_with_level(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::warn!("Logger already initialized, ignoring level '{default_level}'");
    }
}
