//! API key storage capability.
//!
//! The orchestrator never reaches into ambient storage for the Gemini key;
//! it goes through an injected [`ApiKeyStore`]. Hosts back this with whatever
//! persistence they have (browser local storage, a keychain, a config file)
//! under the well-known [`API_KEY_STORAGE_KEY`] name. The in-memory
//! implementation covers tests and hosts that manage persistence themselves.

use std::sync::Mutex;

use secrecy::SecretString;

/// Storage key name hosts should use for durable key-value backends.
pub const API_KEY_STORAGE_KEY: &str = "gemini_api_key";

/// Get/set/remove access to a single opaque API key.
///
/// The key is never validated for shape; an absent key reads as `None`.
pub trait ApiKeyStore: Send + Sync {
    /// Retrieve the stored API key, if any
    fn get(&self) -> Option<SecretString>;
    /// Store the API key, replacing any previous value
    fn set(&self, api_key: SecretString);
    /// Remove the stored API key
    fn remove(&self);
}

/// In-memory key store
#[derive(Default)]
pub struct MemoryKeyStore {
    inner: Mutex<Option<SecretString>>,
}

impl MemoryKeyStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl ApiKeyStore for MemoryKeyStore {
    fn get(&self) -> Option<SecretString> {
        self.inner.lock().expect("key store lock poisoned").clone()
    }

    fn set(&self, api_key: SecretString) {
        *self.inner.lock().expect("key store lock poisoned") = Some(api_key);
    }

    fn remove(&self) {
        *self.inner.lock().expect("key store lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn memory_store_round_trips_and_removes() {
        let store = MemoryKeyStore::new();
        assert!(store.get().is_none());

        store.set(SecretString::from("k1"));
        assert_eq!(store.get().unwrap().expose_secret(), "k1");

        store.set(SecretString::from("k2"));
        assert_eq!(store.get().unwrap().expose_secret(), "k2");

        store.remove();
        assert!(store.get().is_none());
    }
}
