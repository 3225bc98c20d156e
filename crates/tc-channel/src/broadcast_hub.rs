use crate::{BroadcastMessage, ChannelConfig, MemberId, Subscription};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

/// In-process transport: named broadcast groups shared by every tab on the hub.
///
/// Group membership is decided by name only. A group is created by its first
/// subscriber and removed when its last subscriber leaves. Every member has
/// its own unbounded queue, so a slow receiver never loses messages.
pub struct BroadcastHub {
    inner: Arc<Mutex<HubInner>>,
    config: Arc<ChannelConfig>,
}

struct HubInner {
    channels: HashMap<String, NamedChannel>,
}

/// Per-name broadcast group
pub(crate) struct NamedChannel {
    members: HashMap<MemberId, mpsc::UnboundedSender<BroadcastMessage>>,
}

impl BroadcastHub {
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubInner {
                channels: HashMap::new(),
            })),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Join the group called `name`, creating it if needed
    pub fn subscribe(&self, name: &str) -> Subscription {
        let mut inner = self.lock();

        let channel = inner.channels.entry(name.to_string()).or_insert_with(|| {
            log::info!("Created broadcast channel {name:?}");
            NamedChannel {
                members: HashMap::new(),
            }
        });

        let (sender, receiver) = mpsc::unbounded_channel();
        let member_id = MemberId::new();
        channel.members.insert(member_id, sender);

        log::debug!(
            "Member {member_id} joined channel {name:?} ({} total subscribers)",
            channel.members.len()
        );

        Subscription {
            member_id,
            receiver,
        }
    }

    /// Remove `member_id` from the group called `name`. Its receiver sees
    /// the end of the stream once queued messages are drained.
    pub fn unsubscribe(&self, name: &str, member_id: MemberId) {
        let mut inner = self.lock();

        let Some(channel) = inner.channels.get_mut(name) else {
            return;
        };

        if channel.members.remove(&member_id).is_none() {
            return;
        }

        log::debug!(
            "Member {member_id} left channel {name:?} ({} remaining subscribers)",
            channel.members.len()
        );

        if channel.members.is_empty() {
            inner.channels.remove(name);
            log::info!("Removed empty broadcast channel {name:?}");
        }
    }

    /// Queue a message for every member of `name` except its origin.
    ///
    /// Returns the number of members the message was queued for.
    pub fn broadcast(&self, name: &str, message: BroadcastMessage) -> usize {
        let inner = self.lock();

        let Some(channel) = inner.channels.get(name) else {
            log::debug!("No broadcast channel exists for {name:?}");
            return 0;
        };

        let delivered = channel
            .members
            .iter()
            .filter(|(member_id, _)| **member_id != message.origin)
            .filter(|(_, sender)| sender.send(message.clone()).is_ok())
            .count();

        log::debug!("Broadcast to channel {name:?} ({delivered} receivers)");
        delivered
    }

    pub fn subscriber_count(&self, name: &str) -> usize {
        self.lock()
            .channels
            .get(name)
            .map(|c| c.members.len())
            .unwrap_or(0)
    }

    /// Names of all groups with at least one subscriber
    pub fn channel_names(&self) -> Vec<String> {
        self.lock().channels.keys().cloned().collect()
    }

    pub fn channel_count(&self) -> usize {
        self.lock().channels.len()
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(ChannelConfig::default())
    }
}

impl Clone for BroadcastHub {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: Arc::clone(&self.config),
        }
    }
}
