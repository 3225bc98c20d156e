use crate::{ChannelError, Result as ChannelResult, TabId};

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Wire unit exchanged between tabs: `{"tabId": .., "self": .., "data": ..}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Sender's tab identity
    #[serde(rename = "tabId")]
    pub tab_id: TabId,
    /// Sender asked for delivery to its own tab as well
    #[serde(rename = "self")]
    pub include_self: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(tab_id: TabId, include_self: bool, data: T) -> Self {
        Self {
            tab_id,
            include_self,
            data,
        }
    }

    /// True when a receiver on tab `receiver` must drop this envelope
    pub fn is_echo_for(&self, receiver: &TabId) -> bool {
        &self.tab_id == receiver && !self.include_self
    }
}

impl<T: Serialize> Envelope<T> {
    #[track_caller]
    pub fn encode(&self) -> ChannelResult<Bytes> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(ChannelError::encode)
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    #[track_caller]
    pub fn decode(payload: &[u8]) -> ChannelResult<Self> {
        serde_json::from_slice(payload).map_err(ChannelError::decode)
    }
}
