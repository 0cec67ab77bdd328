use crate::config::Config;
use log::LevelFilter;
use simplelog::{self, ConfigBuilder, SharedLogger};
use std::fs::OpenOptions;

/// Log target used for everything related to push/email notification delivery.
/// Records on this target can be mirrored to a dedicated file.
pub const NOTIFICATIONS_TARGET: &str = "notifications";

/// Modules to filter out from logging when not in Trace mode.
/// These are typically verbose dependencies that clutter normal log output.
const FILTERED_MODULES: &[&str] = &["tokio", "mio", "tower", "tracing", "hyper", "axum"];

pub struct Logger {}

impl Logger {
    /// Initializes the global logger with configuration based on the provided Config.
    ///
    /// When the log level is set to Trace, all logs including dependency logs are shown.
    /// For all other log levels, verbose dependency logs are filtered out.
    /// If a notification log file is configured, notification records are also
    /// appended to it.
    pub fn init_logger(config: &Config) {
        let log_level_filter = Self::convert_level_filter(config.log_level_filter);
        let apply_filters = Self::should_filter_dependencies(config.log_level_filter);

        let mut loggers: Vec<Box<dyn SharedLogger>> = vec![simplelog::TermLogger::new(
            log_level_filter,
            Self::build_log_config(apply_filters),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )];

        if let Some(path) = config.notification_log_file() {
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => loggers.push(simplelog::WriteLogger::new(
                    log_level_filter,
                    Self::build_notifications_config(),
                    file,
                )),
                Err(e) => eprintln!("Failed to open notification log file {path}: {e}"),
            }
        }

        if let Err(e) = simplelog::CombinedLogger::init(loggers) {
            eprintln!("Failed to start simplelog: {e}");
        }
    }

    /// Converts log::LevelFilter to simplelog::LevelFilter.
    fn convert_level_filter(level: LevelFilter) -> simplelog::LevelFilter {
        match level {
            LevelFilter::Off => simplelog::LevelFilter::Off,
            LevelFilter::Error => simplelog::LevelFilter::Error,
            LevelFilter::Warn => simplelog::LevelFilter::Warn,
            LevelFilter::Info => simplelog::LevelFilter::Info,
            LevelFilter::Debug => simplelog::LevelFilter::Debug,
            LevelFilter::Trace => simplelog::LevelFilter::Trace,
        }
    }

    /// Determines whether dependency logging should be filtered.
    ///
    /// Returns `false` for Trace level (show all logs), `true` for all other levels.
    fn should_filter_dependencies(level: LevelFilter) -> bool {
        level != LevelFilter::Trace
    }

    /// Builds a simplelog Config with optional module filtering.
    ///
    /// When `apply_filters` is true, logs from noisy dependencies are suppressed.
    fn build_log_config(apply_filters: bool) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if apply_filters {
            for module in FILTERED_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }

    /// Builds the config for the notification file logger: only the
    /// notifications target passes.
    fn build_notifications_config() -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();
        builder.add_filter_allow_str(NOTIFICATIONS_TARGET);
        builder.build()
    }
}
