use crate::{
    BroadcastMessage, ChannelError, EmitterOptions, Envelope, ListenerOptions, ListenerRegistry,
    MemberId, Result as ChannelResult, TabContext, TabId,
};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A named channel shared by every tab that opens the same name on a hub.
///
/// Messages posted on one instance reach the listeners of every other
/// instance with that name. Instances on the posting tab drop the message
/// unless it was posted with [`EmitterOptions::include_self`], in which case
/// the posting instance also delivers it to its own listeners, synchronously,
/// before `post_data` returns.
///
/// Remote delivery runs on a receive task spawned on the current tokio
/// runtime. Dropping the channel stops that task and leaves the group.
pub struct Channel<T> {
    name: String,
    context: TabContext,
    member_id: MemberId,
    registry: Arc<ListenerRegistry<T>>,
    receive_task: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl<T> Channel<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    /// Join the group called `name` from `context`.
    ///
    /// Must be called from within a tokio runtime. The tab id is not
    /// resolved here; it is created on first use.
    pub fn open(context: &TabContext, name: impl Into<String>) -> ChannelResult<Self> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| ChannelError::no_runtime())?;

        let name = name.into();
        let subscription = context.hub().subscribe(&name);
        let registry = Arc::new(ListenerRegistry::new());

        let receive_task = runtime.spawn(receive_loop(
            subscription.receiver,
            subscription.member_id,
            name.clone(),
            context.clone(),
            Arc::clone(&registry),
        ));

        info!("Opened channel {name:?} as member {}", subscription.member_id);

        Ok(Self {
            name,
            context: context.clone(),
            member_id: subscription.member_id,
            registry,
            receive_task: Mutex::new(Some(receive_task)),
            closed: AtomicBool::new(false),
        })
    }

    /// Register a listener for incoming data
    pub fn on_data<F>(&self, listener: F, options: ListenerOptions)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.registry.add(Arc::new(listener), options);
    }

    /// Send `data` to every other instance of this channel.
    ///
    /// Fails only when `data` cannot be encoded, in which case nothing is
    /// delivered. On a closed channel remote delivery is skipped but self
    /// delivery still happens.
    pub fn post_data(&self, data: T, options: EmitterOptions) -> ChannelResult<()> {
        let envelope = Envelope::new(self.context.tab_id(), options.include_self, &data);
        let payload = envelope.encode()?;

        if self.is_closed() {
            debug!("Channel {:?} is closed, skipping remote delivery", self.name);
        } else {
            let receivers = self.context.hub().broadcast(
                &self.name,
                BroadcastMessage::new(self.member_id, payload),
            );
            debug!(
                "Posted to channel {:?} from tab {} ({receivers} receivers)",
                self.name, envelope.tab_id
            );
        }

        if options.include_self {
            self.registry.dispatch(&data);
        }

        Ok(())
    }
}

impl<T> Channel<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    pub fn tab_id(&self) -> TabId {
        self.context.tab_id()
    }

    pub fn context(&self) -> &TabContext {
        &self.context
    }

    /// Registered listeners, persistent and pending one-shot
    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Stop receiving and leave the group. Calling it again is a no-op.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let task = self
            .receive_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.abort();
        }

        self.context.hub().unsubscribe(&self.name, self.member_id);
        info!("Closed channel {:?} (member {})", self.name, self.member_id);
    }
}

impl<T> Drop for Channel<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T> std::fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("member_id", &self.member_id)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

async fn receive_loop<T>(
    mut receiver: mpsc::UnboundedReceiver<BroadcastMessage>,
    member_id: MemberId,
    name: String,
    context: TabContext,
    registry: Arc<ListenerRegistry<T>>,
) where
    T: DeserializeOwned,
{
    let backlog_warning = context.hub().config().backlog_warning;
    let mut backlogged = false;

    while let Some(message) = receiver.recv().await {
        handle_message(&message, &name, &context, &registry);

        let pending = receiver.len();
        if pending >= backlog_warning && !backlogged {
            warn!("Channel {name:?} member {member_id} is behind by {pending} messages");
            backlogged = true;
        } else if pending < backlog_warning {
            backlogged = false;
        }
    }

    debug!("Channel {name:?} closed, stopping receive task for {member_id}");
}

fn handle_message<T>(
    message: &BroadcastMessage,
    name: &str,
    context: &TabContext,
    registry: &ListenerRegistry<T>,
) where
    T: DeserializeOwned,
{
    let envelope = match Envelope::<T>::decode(&message.payload) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("Dropping malformed message on channel {name:?}: {e}");
            return;
        }
    };

    if envelope.is_echo_for(&context.tab_id()) {
        debug!(
            "Dropping message on channel {name:?} from own tab {}",
            envelope.tab_id
        );
        return;
    }

    let invoked = registry.dispatch(&envelope.data);
    debug!("Delivered message on channel {name:?} to {invoked} listeners");
}
