#![forbid(unsafe_code)]

//! `localStorage` backend for the user store.

use rcloud_core::{KeyValueStorage, StoreError};
use web_sys::Storage;

use crate::dom;

/// Browser-local key/value storage.
///
/// The handle is resolved per call so a storage that becomes unavailable
/// (private mode, blocked cookies) degrades to errors instead of panics.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Result<Storage, StoreError> {
        let window = dom::window().map_err(|e| StoreError::Unavailable(e.to_string()))?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(storage),
            Ok(None) => Err(StoreError::Unavailable("localStorage is null".into())),
            Err(err) => Err(StoreError::Unavailable(dom::js_error(err).to_string())),
        }
    }
}

impl KeyValueStorage for BrowserStorage {
    fn name(&self) -> &str {
        "localStorage"
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::storage()?
            .get_item(key)
            .map_err(|err| StoreError::Unavailable(dom::js_error(err).to_string()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|err| StoreError::Write(dom::js_error(err).to_string()))
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|err| StoreError::Write(dom::js_error(err).to_string()))
    }
}
