// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config service and storage port for Echo renderer tools.
//!
//! Settings are JSON blobs stored by key. Each settings type names its own
//! key through [`ConfigSection`], so callers never spell keys by hand.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// A settings type stored under a fixed key.
pub trait ConfigSection: Serialize + DeserializeOwned + Default {
    /// Store key of the section.
    const KEY: &'static str;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A stored blob does not parse as the requested type.
    #[error("invalid config `{key}`: {source}")]
    Invalid {
        /// Offending key.
        key: String,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// Serialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Serializes config values and delegates storage to a [`ConfigStore`].
#[derive(Debug, Clone)]
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the inner store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize the value stored under `key`.
    ///
    /// Missing keys and empty blobs yield `Ok(None)`.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        let bytes = match self.store.load_raw(key) {
            Ok(bytes) if bytes.is_empty() => return Ok(None),
            Ok(bytes) => bytes,
            Err(ConfigError::NotFound) => return Ok(None),
            Err(err) => return Err(err),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| ConfigError::Invalid {
                key: key.to_owned(),
                source,
            })
    }

    /// Like [`load`](Self::load), falling back to `T::default()` when missing.
    pub fn load_or_default<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Default,
    {
        Ok(self.load(key)?.unwrap_or_default())
    }

    /// Serialize and persist a config value for `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }

    /// Load a section from its own key, defaulting when missing.
    pub fn load_section<T: ConfigSection>(&self) -> Result<T, ConfigError> {
        self.load_or_default(T::KEY)
    }

    /// Persist a section under its own key.
    pub fn save_section<T: ConfigSection>(&self, value: &T) -> Result<(), ConfigError> {
        self.save(T::KEY, value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct MapStore(RefCell<BTreeMap<String, Vec<u8>>>);

    impl ConfigStore for MapStore {
        fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
            self.0.borrow().get(key).cloned().ok_or(ConfigError::NotFound)
        }

        fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
            self.0.borrow_mut().insert(key.to_owned(), data.to_vec());
            Ok(())
        }
    }

    #[derive(Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Section {
        cycles: u32,
    }

    impl ConfigSection for Section {
        const KEY: &'static str = "section";
    }

    #[test]
    fn missing_and_empty_blobs_load_as_none() {
        let service = ConfigService::new(MapStore::default());
        assert_eq!(service.load::<Section>("absent").unwrap(), None);
        service.store().save_raw("empty", b"").unwrap();
        assert_eq!(service.load::<Section>("empty").unwrap(), None);
    }

    #[test]
    fn sections_round_trip_under_their_key() {
        let service = ConfigService::new(MapStore::default());
        assert_eq!(service.load_section::<Section>().unwrap(), Section::default());
        service.save_section(&Section { cycles: 9 }).unwrap();
        assert!(service.store().0.borrow().contains_key("section"));
        assert_eq!(service.load_section::<Section>().unwrap().cycles, 9);
    }

    #[test]
    fn malformed_blob_names_its_key() {
        let service = ConfigService::new(MapStore::default());
        service.store().save_raw("section", b"{not json").unwrap();
        let err = service.load_section::<Section>().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "section"));
    }
}
