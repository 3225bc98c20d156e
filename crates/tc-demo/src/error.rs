use thiserror::Error;

#[derive(Error, Debug)]
pub enum DemoError {
    #[error("Config error: {0}")]
    Config(#[from] tc_config::ConfigError),

    #[error("Channel error: {0}")]
    Channel(#[from] tc_channel::ChannelError),

    #[error("Logger error: {message}")]
    Logger { message: String },
}

pub type Result<T> = std::result::Result<T, DemoError>;
