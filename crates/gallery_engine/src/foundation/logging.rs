//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging, using `default_level` when `RUST_LOG` is unset
///
/// Returns `false` if a logger was already installed (for example by an
/// earlier test in the same process).
pub fn init_with_default(default_level: &str) -> bool {
    let env = env_logger::Env::default().default_filter_or(default_level);
    env_logger::Builder::from_env(env).try_init().is_ok()
}

/// Install the logger before configuration is available
///
/// With `RUST_LOG` set this is [`init_with_default`]. Otherwise every record
/// reaches the logger, the visible level starts at `info` and [`set_level`]
/// can change it later.
pub fn init_early() -> bool {
    if std::env::var_os("RUST_LOG").is_some() {
        return init_with_default("info");
    }
    let installed = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Trace)
        .try_init()
        .is_ok();
    log::set_max_level(log::LevelFilter::Info);
    installed
}

/// Change the visible level after [`init_early`]; `RUST_LOG` wins
///
/// Returns `false` when the level was not applied.
pub fn set_level(level: &str) -> bool {
    if std::env::var_os("RUST_LOG").is_some() {
        return false;
    }
    match level.parse::<log::LevelFilter>() {
        Ok(filter) => {
            log::set_max_level(filter);
            true
        }
        Err(_) => {
            log::warn!("Unknown log level '{level}', keeping {}", log::max_level());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_level_is_rejected() {
        assert!(!set_level("loud"));
    }
}
