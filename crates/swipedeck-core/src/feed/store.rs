use std::collections::HashMap;
use std::convert::Infallible;

use log::warn;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// String key/value persistence, in the shape of a mobile async-storage.
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get(&mut self, key: &str) -> Result<Option<String>, Self::Error>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
    fn remove(&mut self, key: &str) -> Result<(), Self::Error>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failed on key {key}: {source}")]
    Backend {
        key: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to encode value for key {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn backend<E>(key: &str, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            key: key.to_owned(),
            source: Box::new(error),
        }
    }
}

/// Volatile store, used for guests and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get(&mut self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Reads a JSON value. A missing key or a payload that does not decode
/// yields `V::default()`; only backend failures are errors.
pub(crate) fn load_json<S, V>(store: &mut S, key: &str) -> Result<V, StoreError>
where
    S: KeyValueStore,
    V: DeserializeOwned + Default,
{
    let Some(raw) = store
        .get(key)
        .map_err(|error| StoreError::backend(key, error))?
    else {
        return Ok(V::default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(error) => {
            warn!("store: discarding undecodable value under {key}: {error}");
            Ok(V::default())
        }
    }
}

pub(crate) fn save_json<S, V>(store: &mut S, key: &str, value: &V) -> Result<(), StoreError>
where
    S: KeyValueStore,
    V: Serialize + ?Sized,
{
    let payload = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_owned(),
        source,
    })?;
    store
        .set(key, &payload)
        .map_err(|error| StoreError::backend(key, error))
}

pub(crate) fn remove_key<S: KeyValueStore>(store: &mut S, key: &str) -> Result<(), StoreError> {
    store
        .remove(key)
        .map_err(|error| StoreError::backend(key, error))
}
