use crate::SessionStore;

use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Random bytes drawn for a new tab id; each becomes one decimal digit.
pub const TAB_ID_BYTES: usize = 8;

/// Identity of one browsing context.
///
/// Opaque on the wire: a stored value is reused verbatim even when it was
/// not produced by [`TabId::generate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    /// Draw a fresh id: one digit per random byte, `byte % 10`.
    pub fn generate() -> Self {
        let mut bytes = [0u8; TAB_ID_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self::from_bytes(&bytes)
    }

    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.iter().map(|b| char::from(b'0' + b % 10)).collect())
    }

    /// Read the id stored under `key`, generating and storing one if absent.
    pub fn resolve(store: &dyn SessionStore, key: &str) -> Self {
        if let Some(existing) = store.get(key)
            && !existing.is_empty()
        {
            return Self(existing);
        }

        let id = Self::generate();
        store.set(key, id.as_str());
        log::debug!("Generated tab id {id}");
        id
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TabId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TabId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
