mod channel_config;
mod config;
mod error;
mod log_level;
mod logging_config;

pub use channel_config::ChannelConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;

const CONFIG_DIR_ENV: &str = "TC_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".tc";
const CONFIG_FILENAME: &str = "config.toml";

// Channel
const DEFAULT_BACKLOG_WARNING: usize = 1000;
const MIN_BACKLOG_WARNING: usize = 1;
const MAX_BACKLOG_WARNING: usize = 100_000;
pub const DEFAULT_STORAGE_KEY: &str = "tab-channel-id";

// Logging
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_LOG_COLORED: bool = true;

#[cfg(test)]
mod tests;
