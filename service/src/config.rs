use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;

/// Channels with more members than this never register `@channel`/`@all`/`@here`.
pub const DEFAULT_MAX_NOTIFICATIONS_PER_CHANNEL: usize = 1000;

/// Number of outbound events a live session may have queued before it is
/// considered stuck and disconnected.
pub const DEFAULT_SESSION_QUEUE_CAPACITY: usize = 256;

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap_or(LevelFilter::Info)),
        )]
    pub log_level_filter: LevelFilter,

    /// Optional file that receives a copy of every record logged on the notifications target
    #[arg(long, env)]
    notification_log_file: Option<String>,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap_or(RustEnv::Development)),
    )]
    pub runtime_env: RustEnv,

    /// Channels with more members than this do not notify on @channel, @all or @here
    #[arg(long, env, default_value_t = DEFAULT_MAX_NOTIFICATIONS_PER_CHANNEL)]
    max_notifications_per_channel: usize,

    /// Outbound queue capacity of a single live session
    #[arg(long, env, default_value_t = DEFAULT_SESSION_QUEUE_CAPACITY)]
    session_queue_capacity: usize,

    /// Hand email notifications to the email collaborator
    #[arg(long, env, default_value_t = true, action = clap::ArgAction::Set)]
    send_email_notifications: bool,

    /// Hand push notifications to the push collaborator
    #[arg(long, env, default_value_t = true, action = clap::ArgAction::Set)]
    send_push_notifications: bool,

    /// Public base URL of the server, used to construct links in notifications
    #[arg(long, env, default_value = "http://localhost:8065")]
    site_url: String,

    /// Human readable site name used in notification subjects
    #[arg(long, env, default_value = "Chat")]
    site_name: String,
}

impl Default for Config {
    /// Builds a configuration from the environment only, ignoring process
    /// arguments (which belong to the test harness when running tests).
    fn default() -> Self {
        Config::parse_from([env!("CARGO_PKG_NAME")])
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn max_notifications_per_channel(&self) -> usize {
        self.max_notifications_per_channel
    }

    pub fn set_max_notifications_per_channel(mut self, max: usize) -> Self {
        self.max_notifications_per_channel = max;
        self
    }

    pub fn session_queue_capacity(&self) -> usize {
        self.session_queue_capacity
    }

    pub fn send_email_notifications(&self) -> bool {
        self.send_email_notifications
    }

    pub fn set_send_email_notifications(mut self, enabled: bool) -> Self {
        self.send_email_notifications = enabled;
        self
    }

    pub fn send_push_notifications(&self) -> bool {
        self.send_push_notifications
    }

    pub fn set_send_push_notifications(mut self, enabled: bool) -> Self {
        self.send_push_notifications = enabled;
        self
    }

    /// Returns the site URL without a trailing slash.
    pub fn site_url(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    pub fn notification_log_file(&self) -> Option<&str> {
        self.notification_log_file.as_deref()
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_notification_flags() {
        let config = Config::try_parse_from([
            "notify",
            "--max-notifications-per-channel",
            "3",
            "--session-queue-capacity",
            "8",
            "--send-email-notifications",
            "false",
            "--site-url",
            "https://chat.example.com/",
        ])
        .expect("flags should parse");

        assert_eq!(config.max_notifications_per_channel(), 3);
        assert_eq!(config.session_queue_capacity(), 8);
        assert!(!config.send_email_notifications());
        assert_eq!(config.site_url(), "https://chat.example.com");
    }

    #[test]
    fn test_parse_log_level_and_runtime_env() {
        let config = Config::try_parse_from([
            "notify",
            "--log-level-filter",
            "DEBUG",
            "--runtime-env",
            "PRODUCTION",
        ])
        .expect("flags should parse");

        assert_eq!(config.log_level_filter, LevelFilter::Debug);
        assert!(config.is_production());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let result = Config::try_parse_from(["notify", "--log-level-filter", "LOUD"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_setters_override_values() {
        let config = Config::try_parse_from(["notify"])
            .expect("defaults should parse")
            .set_max_notifications_per_channel(4)
            .set_send_push_notifications(false);

        assert_eq!(config.max_notifications_per_channel(), 4);
        assert!(!config.send_push_notifications());
    }

    #[test]
    fn test_rust_env_from_str_is_case_insensitive() {
        assert_eq!("Staging".parse::<RustEnv>(), Ok(RustEnv::Staging));
        assert_eq!("bogus".parse::<RustEnv>(), Err(RustEnvParseError));
    }
}
