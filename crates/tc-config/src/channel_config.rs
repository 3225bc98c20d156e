use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_BACKLOG_WARNING, DEFAULT_STORAGE_KEY,
    MAX_BACKLOG_WARNING, MIN_BACKLOG_WARNING,
};

use serde::Deserialize;

/// Broadcast channel settings shared by every channel opened on a hub.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Pending messages per receiver at which a backlog warning is logged
    pub backlog_warning: usize,
    /// Session store key holding the tab identity
    pub storage_key: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            backlog_warning: DEFAULT_BACKLOG_WARNING,
            storage_key: String::from(DEFAULT_STORAGE_KEY),
        }
    }
}

impl ChannelConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !(MIN_BACKLOG_WARNING..=MAX_BACKLOG_WARNING).contains(&self.backlog_warning) {
            return Err(ConfigError::channel(format!(
                "channel.backlog_warning must be {}-{}, got {}",
                MIN_BACKLOG_WARNING, MAX_BACKLOG_WARNING, self.backlog_warning
            )));
        }

        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::channel("channel.storage_key cannot be empty"));
        }

        Ok(())
    }
}
