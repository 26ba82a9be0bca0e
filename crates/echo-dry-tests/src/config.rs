// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory config store fake for testing without filesystem I/O.

use echo_app_core::config::{ConfigError, ConfigStore};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory implementation of [`ConfigStore`] for testing.
///
/// Clones share state, so a test can hand one clone to a `ConfigService`
/// and inspect the other.
///
/// # Example
///
/// ```
/// use echo_dry_tests::InMemoryConfigStore;
/// use echo_app_core::config::ConfigService;
///
/// let store = InMemoryConfigStore::new();
/// let service = ConfigService::new(store.clone());
///
/// service.save("scene-sim", &serde_json::json!({"cycles": 4})).unwrap();
/// assert_eq!(store.save_count(), 1);
/// assert!(store.contains_key("scene-sim"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryConfigStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    data: BTreeMap<String, Vec<u8>>,
    load_count: usize,
    save_count: usize,
    fail_on_load: bool,
    fail_on_save: bool,
}

impl InMemoryConfigStore {
    /// Create a new empty in-memory config store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding one raw blob under `key`.
    pub fn with_raw(key: &str, data: &[u8]) -> Self {
        let store = Self::new();
        store.lock().data.insert(key.to_owned(), data.to_vec());
        store
    }

    /// Configure the store to fail on load operations.
    pub fn set_fail_on_load(&self, fail: bool) {
        self.lock().fail_on_load = fail;
    }

    /// Configure the store to fail on save operations.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.lock().fail_on_save = fail;
    }

    /// Number of `load_raw` calls, failed ones included.
    pub fn load_count(&self) -> usize {
        self.lock().load_count
    }

    /// Number of `save_raw` calls, failed ones included.
    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }

    /// Check if a key exists in the store.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().data.contains_key(key)
    }

    /// Raw blob stored under `key`.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().data.get(key).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let mut inner = self.lock();
        inner.load_count += 1;

        if inner.fail_on_load {
            return Err(ConfigError::Other("simulated load failure".into()));
        }

        inner.data.get(key).cloned().ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let mut inner = self.lock();
        inner.save_count += 1;

        if inner.fail_on_save {
            return Err(ConfigError::Other("simulated save failure".into()));
        }

        inner.data.insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_data_and_counts() {
        let a = InMemoryConfigStore::new();
        let b = a.clone();
        a.save_raw("k", b"v").unwrap();
        assert_eq!(b.load_raw("k").unwrap(), b"v");
        assert_eq!(b.save_count(), 1);
        assert_eq!(a.load_count(), 1);
    }

    #[test]
    fn failures_still_count_and_store_nothing() {
        let store = InMemoryConfigStore::with_raw("k", b"old");
        store.set_fail_on_save(true);
        store.set_fail_on_load(true);
        assert!(store.save_raw("k", b"new").is_err());
        assert!(store.load_raw("k").is_err());
        assert_eq!(store.raw("k").unwrap(), b"old");
        assert_eq!((store.save_count(), store.load_count()), (1, 1));
    }

    #[test]
    fn missing_key_is_not_found() {
        let store = InMemoryConfigStore::new();
        assert!(matches!(store.load_raw("absent"), Err(ConfigError::NotFound)));
    }
}
