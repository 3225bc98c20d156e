#![allow(dead_code)]

use tc_channel::{BroadcastHub, MemorySessionStore, SessionStore, TAB_ID_STORAGE_KEY, TabContext};

use std::sync::{Arc, Mutex};

use tokio::time::{Duration, sleep, timeout};

/// Collects every payload a listener receives, in order
#[derive(Clone)]
pub struct Recorder<T> {
    received: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone + Send + 'static> Recorder<T> {
    pub fn new() -> Self {
        Self {
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn listener(&self) -> impl Fn(&T) + Send + Sync + 'static {
        let received = Arc::clone(&self.received);
        move |data: &T| received.lock().unwrap().push(data.clone())
    }

    pub fn received(&self) -> Vec<T> {
        self.received.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

/// A browsing context whose session store already holds `tab_id`
pub fn tab_with_id(hub: &BroadcastHub, tab_id: &str) -> TabContext {
    let store = MemorySessionStore::new();
    store.set(TAB_ID_STORAGE_KEY, tab_id);
    TabContext::with_store(hub.clone(), Arc::new(store))
}

/// Let the receive tasks drain their queues
pub async fn settle() {
    sleep(Duration::from_millis(25)).await;
}

/// Poll until `done` holds, failing the test after a few seconds
pub async fn settle_until(done: impl Fn() -> bool) {
    timeout(Duration::from_secs(5), async {
        while !done() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("receive tasks did not catch up");
}

pub fn unique_name() -> String {
    uuid::Uuid::new_v4().to_string()
}
