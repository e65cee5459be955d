//! Storage-backed atoms

use crate::atom::{Atom, Subscription};
use crate::error::{Result, StorageError};
use crate::storage::Storage;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// An [`Atom`] whose value is mirrored to a [`Storage`] key as JSON
///
/// The storage key is the source of truth: `get`, `with` and `update` read
/// it on every call, so several handles on one key never overwrite each
/// other with stale values. An absent key reads as the configured default.
/// Every `set` persists before subscribers are notified. Storage failures
/// are logged and never propagated; while the backend cannot be read (or
/// holds undecodable data) the last value set through this handle is used.
///
/// Subscribers belong to the handle they were registered on and only see
/// writes made through it.
///
/// # Examples
///
/// ```
/// use terra_atom::{MemoryStorage, StoredAtom};
/// use std::rc::Rc;
///
/// let storage = Rc::new(MemoryStorage::new());
/// let tab = StoredAtom::new(storage.clone(), "last-tab", "dashboard".to_string());
///
/// tab.set("data".to_string());
///
/// let reloaded = StoredAtom::new(storage, "last-tab", "dashboard".to_string());
/// assert_eq!(reloaded.get(), "data");
///
/// reloaded.reset();
/// assert_eq!(reloaded.get(), "dashboard");
/// ```
pub struct StoredAtom<T> {
    atom: Atom<T>,
    storage: Rc<dyn Storage>,
    key: String,
    default: T,
}

impl<T> Clone for StoredAtom<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            atom: self.atom.clone(),
            storage: Rc::clone(&self.storage),
            key: self.key.clone(),
            default: self.default.clone(),
        }
    }
}

impl<T> StoredAtom<T>
where
    T: Serialize + DeserializeOwned + Clone + 'static,
{
    pub fn new(storage: Rc<dyn Storage>, key: impl Into<String>, default: T) -> Self {
        let key = key.into();
        let initial = load(storage.as_ref(), &key).unwrap_or_else(|| default.clone());

        Self {
            atom: Atom::new(initial),
            storage,
            key,
            default,
        }
    }

    pub fn get(&self) -> T {
        self.read()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.read())
    }

    /// Persists `value`, then updates the atom and notifies subscribers
    pub fn set(&self, value: T) {
        if let Err(e) = self.persist(&value) {
            tracing::error!(
                key = %self.key,
                backend = self.storage.name(),
                error = %e,
                "failed to persist stored atom"
            );
        }
        self.atom.set(value);
    }

    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.read());
        self.set(next);
    }

    pub fn subscribe(&self, callback: impl Fn(&T, &T) + 'static) -> Subscription {
        self.atom.subscribe(callback)
    }

    /// Restores the configured default value
    pub fn reset(&self) {
        self.set(self.default.clone());
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> T {
        match self.storage.get_item(&self.key) {
            Ok(None) => self.default.clone(),
            Ok(Some(raw)) => decode(&self.key, &raw).unwrap_or_else(|| self.atom.get()),
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    backend = self.storage.name(),
                    error = %e,
                    "failed to read stored atom"
                );
                self.atom.get()
            }
        }
    }

    fn persist(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: self.key.clone(),
            source,
        })?;
        self.storage.set_item(&self.key, &json)
    }
}

fn load<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = match storage.get_item(key) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(key, backend = storage.name(), error = %e, "failed to read stored atom");
            return None;
        }
    };

    decode(key, &raw)
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring undecodable stored value");
            None
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StoredAtom<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredAtom")
            .field("key", &self.key)
            .field("backend", &self.storage.name())
            .field("atom", &self.atom)
            .finish()
    }
}
