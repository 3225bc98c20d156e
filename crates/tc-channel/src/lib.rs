pub mod broadcast_hub;
pub mod broadcast_message;
pub mod channel;
pub mod emitter_options;
pub mod envelope;
pub mod error;
pub mod listener_options;
pub mod listener_registry;
pub mod member_id;
pub mod session_store;
pub mod subscription;
pub mod tab_context;
pub mod tab_id;

pub use broadcast_hub::BroadcastHub;
pub use broadcast_message::BroadcastMessage;
pub use channel::Channel;
pub use emitter_options::EmitterOptions;
pub use envelope::Envelope;
pub use error::{ChannelError, Result};
pub use listener_options::ListenerOptions;
pub use listener_registry::{Listener, ListenerRegistry};
pub use member_id::MemberId;
pub use session_store::{MemorySessionStore, SessionStore};
pub use subscription::Subscription;
pub use tab_context::TabContext;
pub use tab_id::{TAB_ID_BYTES, TabId};

pub use tc_config::{ChannelConfig, DEFAULT_STORAGE_KEY as TAB_ID_STORAGE_KEY};
