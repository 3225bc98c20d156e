use crate::{BroadcastHub, MemorySessionStore, SessionStore, TabId};

use std::sync::{Arc, Mutex, PoisonError};

/// One browsing context: a hub to talk through and the context's own
/// session store.
///
/// Clones share the same store, so every channel opened from a context
/// (or its clones) sees the same tab id.
#[derive(Clone)]
pub struct TabContext {
    hub: BroadcastHub,
    store: Arc<dyn SessionStore>,
    identity_lock: Arc<Mutex<()>>,
}

impl TabContext {
    /// New context with a fresh, empty session store
    pub fn new(hub: BroadcastHub) -> Self {
        Self::with_store(hub, Arc::new(MemorySessionStore::new()))
    }

    pub fn with_store(hub: BroadcastHub, store: Arc<dyn SessionStore>) -> Self {
        Self {
            hub,
            store,
            identity_lock: Arc::new(Mutex::new(())),
        }
    }

    /// This context's tab id, generated and persisted on first access
    pub fn tab_id(&self) -> TabId {
        // get-or-create must not race between channels of one context
        let _guard = self
            .identity_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        TabId::resolve(self.store.as_ref(), self.storage_key())
    }

    pub fn hub(&self) -> &BroadcastHub {
        &self.hub
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn storage_key(&self) -> &str {
        &self.hub.config().storage_key
    }
}

impl std::fmt::Debug for TabContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabContext")
            .field("storage_key", &self.storage_key())
            .finish_non_exhaustive()
    }
}
