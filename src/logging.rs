//! Diagnostic logging for the benchmark binaries.
//!
//! Events go to stderr through a `tracing_subscriber` formatter so that
//! stdout carries nothing but the CSV report. Nothing is read from the
//! environment: the level comes from the command line only.

use std::error::Error;
use std::fmt::{self, Write as _};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// How the process-wide subscriber should behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LevelFilter,
    /// Colour codes; off when stderr is redirected to a file by CI.
    pub ansi: bool,
    /// Show module paths next to each event.
    pub include_targets: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: LevelFilter::WARN,
            ansi: true,
            include_targets: false,
        }
    }
}

impl LogConfig {
    /// Maps `-q` and repeated `-v` flags to a level.
    ///
    /// `quiet` wins over any verbosity: errors only. Otherwise 0 is warn,
    /// 1 info, 2 debug and 3 or more trace.
    pub fn from_verbosity(verbosity: u8, quiet: bool) -> Self {
        let level = if quiet {
            LevelFilter::ERROR
        } else {
            match verbosity {
                0 => LevelFilter::WARN,
                1 => LevelFilter::INFO,
                2 => LevelFilter::DEBUG,
                _ => LevelFilter::TRACE,
            }
        };
        LogConfig {
            level,
            include_targets: verbosity >= 2,
            ..Self::default()
        }
    }
}

/// Local wall-clock timestamps with millisecond precision.
struct LocalClock;

impl FormatTime for LocalClock {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"))
    }
}

/// Installs the stderr subscriber as the process-wide default.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_max_level(config.level)
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .with_target(config.include_targets)
        .with_timer(LocalClock)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LogConfig::from_verbosity(0, false).level, LevelFilter::WARN);
        assert_eq!(LogConfig::from_verbosity(1, false).level, LevelFilter::INFO);
        assert_eq!(LogConfig::from_verbosity(2, false).level, LevelFilter::DEBUG);
        assert_eq!(LogConfig::from_verbosity(9, false).level, LevelFilter::TRACE);
        assert_eq!(LogConfig::from_verbosity(3, true).level, LevelFilter::ERROR);
    }

    #[test]
    fn test_targets_only_when_debugging() {
        assert!(!LogConfig::from_verbosity(1, false).include_targets);
        assert!(LogConfig::from_verbosity(2, false).include_targets);
    }
}
