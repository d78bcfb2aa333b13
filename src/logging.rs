//! Logging setup for image-insights.
//!
//! Thin wrappers around `tracing-subscriber` used by the binaries. The library
//! itself only emits `tracing` events and never installs a subscriber.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable that overrides the level passed to [`init_logging`].
pub const LOG_ENV_VAR: &str = "IMAGE_INSIGHTS_LOG";

/// Log levels, mapped onto the tracing hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }

    /// `Debug` when `verbose` is set, `Info` otherwise.
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose { LogLevel::Debug } else { LogLevel::Info }
    }

    /// Default filter directive for this level, covering the library and both binaries.
    pub fn directive(self) -> String {
        let level = self.to_tracing_level();
        format!(
            "image_insights={level},image_insights_web={level},tower_http={level}",
            level = level
        )
    }
}

/// Initialize logging with a specific level.
///
/// Call once at the start of a binary. When `IMAGE_INSIGHTS_LOG` is set it wins
/// over `level`:
///
/// ```bash
/// IMAGE_INSIGHTS_LOG=image_insights=trace image-insights
/// ```
pub fn init_logging(level: LogLevel) {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(level.directive()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .init();

    tracing::debug!("image-insights logging initialized at level: {:?}", level);
}

/// Initialize logging with a custom filter string.
///
/// ```no_run
/// use image_insights::logging::init_logging_with_filter;
///
/// init_logging_with_filter("image_insights=debug,image_insights::backend=trace");
/// ```
pub fn init_logging_with_filter(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| {
        eprintln!("Invalid log filter '{}', using image_insights=info", filter);
        EnvFilter::new("image_insights=info")
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .init();

    tracing::debug!("image-insights logging initialized with custom filter: {}", filter);
}
