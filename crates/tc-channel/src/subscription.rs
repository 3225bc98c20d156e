use crate::{BroadcastMessage, MemberId};

use tokio::sync::mpsc;

/// Membership in a named hub group
#[derive(Debug)]
pub struct Subscription {
    pub member_id: MemberId,
    pub receiver: mpsc::UnboundedReceiver<BroadcastMessage>,
}
