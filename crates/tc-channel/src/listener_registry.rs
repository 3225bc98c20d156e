use crate::ListenerOptions;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::error;

pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Persistent and one-shot listeners of one channel, in registration order.
pub struct ListenerRegistry<T> {
    inner: Mutex<Listeners<T>>,
}

struct Listeners<T> {
    persistent: Vec<Listener<T>>,
    once: Vec<Listener<T>>,
}

impl<T> ListenerRegistry<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Listeners {
                persistent: Vec::new(),
                once: Vec::new(),
            }),
        }
    }

    pub fn add(&self, listener: Listener<T>, options: ListenerOptions) {
        let mut listeners = self.lock();
        if options.once {
            listeners.once.push(listener);
        } else {
            listeners.persistent.push(listener);
        }
    }

    /// Deliver `data` to every persistent listener, then to every one-shot
    /// listener, draining the one-shot list.
    ///
    /// The lock is released before any listener runs; listeners registered
    /// meanwhile wait for the next dispatch. Returns the number of listeners
    /// invoked.
    pub fn dispatch(&self, data: &T) -> usize {
        let (persistent, once) = {
            let mut listeners = self.lock();
            (
                listeners.persistent.clone(),
                std::mem::take(&mut listeners.once),
            )
        };

        for listener in persistent.iter().chain(once.iter()) {
            invoke(listener, data);
        }

        persistent.len() + once.len()
    }

    pub fn persistent_count(&self) -> usize {
        self.lock().persistent.len()
    }

    pub fn once_count(&self) -> usize {
        self.lock().once.len()
    }

    pub fn len(&self) -> usize {
        let listeners = self.lock();
        listeners.persistent.len() + listeners.once.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Listeners<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A panicking listener is reported and must not stop the others.
fn invoke<T>(listener: &Listener<T>, data: &T) {
    if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(|| listener(data))) {
        error!("Listener panicked during dispatch: {}", panic_message(panic.as_ref()));
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
