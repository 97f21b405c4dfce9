#![forbid(unsafe_code)]

//! Local user store: one JSON record under one storage key.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              UserStore (trait)               │
//! │   load / save / clear of a UserRecord        │
//! └──────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │      LocalUserStore<S: KeyValueStorage>      │
//! │   JSON encode/decode under a single key      │
//! └──────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │          KeyValueStorage (trait)             │
//! │   - MemoryStorage: in-memory (tests, native) │
//! │   - BrowserStorage: window.localStorage (web)│
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Key missing | `load` returns `None` |
//! | Malformed JSON / stored `null` | `load` returns `None`, logged at debug |
//! | Storage unreachable on read | `load` returns `None`, logged at debug |
//! | Storage rejects write | `save` returns `StoreError::Write` |
//!
//! All access happens on the UI thread; a read-modify-write inside one
//! handler is atomic with respect to every other handler.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::StoreError;
use crate::user::UserRecord;

// ─────────────────────────────────────────────────────────────────────────────
// Storage Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// String key-value storage with `localStorage` semantics.
pub trait KeyValueStorage {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory storage backend (testing, native builds).
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one raw entry.
    #[must_use]
    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .data
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        storage
    }

    /// Raw stored value, for assertions.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.data.borrow().get(key).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.data.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.data
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.data.borrow_mut().remove(key);
        Ok(())
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Rc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove_item(key)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User Store
// ─────────────────────────────────────────────────────────────────────────────

/// Load/save/clear of the single [`UserRecord`].
///
/// `load` fails soft: missing or unreadable data means "logged out".
/// `save` overwrites wholesale; there is no merge and no versioning.
pub trait UserStore {
    fn load(&self) -> Option<UserRecord>;

    fn save(&self, record: &UserRecord) -> Result<(), StoreError>;

    fn clear(&self) -> Result<(), StoreError>;
}

impl<T: UserStore + ?Sized> UserStore for &T {
    fn load(&self) -> Option<UserRecord> {
        (**self).load()
    }

    fn save(&self, record: &UserRecord) -> Result<(), StoreError> {
        (**self).save(record)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

impl<T: UserStore + ?Sized> UserStore for Rc<T> {
    fn load(&self) -> Option<UserRecord> {
        (**self).load()
    }

    fn save(&self, record: &UserRecord) -> Result<(), StoreError> {
        (**self).save(record)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

/// JSON [`UserStore`] over any [`KeyValueStorage`].
#[derive(Debug)]
pub struct LocalUserStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> LocalUserStore<S> {
    #[must_use]
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: KeyValueStorage> UserStore for LocalUserStore<S> {
    fn load(&self) -> Option<UserRecord> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                crate::debug!(backend = self.storage.name(), error = %e, "user store read failed");
                return None;
            }
        };
        match serde_json::from_str::<Option<UserRecord>>(&raw) {
            Ok(record) => record,
            Err(e) => {
                crate::debug!(key = %self.key, error = %e, "stored user record is malformed");
                None
            }
        }
    }

    fn save(&self, record: &UserRecord) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(record).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.storage.set_item(&self.key, &json)?;
        crate::debug!(key = %self.key, keys = record.keys.len(), "user record saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove_item(&self.key)?;
        crate::debug!(key = %self.key, "user record cleared");
        Ok(())
    }
}
