use crate::MemberId;

/// A message travelling through a hub group
#[derive(Debug, Clone)]
pub struct BroadcastMessage {
    /// Subscription that sent the message; it never receives its own copy
    pub origin: MemberId,
    /// Encoded envelope
    pub payload: bytes::Bytes,
}

impl BroadcastMessage {
    pub fn new(origin: MemberId, payload: bytes::Bytes) -> Self {
        Self { origin, payload }
    }
}
