#![forbid(unsafe_code)]

//! [`PreferenceStore`] over `window.localStorage`.

use folio_core::storage::{PreferenceStore, StoreError, StoreResult};
use wasm_bindgen::JsValue;
use web_sys::{Storage, Window};

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// Browser local storage. Absent when storage is disabled (e.g. some
/// private browsing modes); every call then reports `Unavailable`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    #[must_use]
    pub fn from_window(window: &Window) -> Self {
        Self {
            storage: window.local_storage().ok().flatten(),
        }
    }

    fn storage(&self) -> StoreResult<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("localStorage is disabled".into()))
    }
}

impl PreferenceStore for LocalStore {
    fn name(&self) -> &str {
        "localStorage"
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|err| StoreError::Unavailable(describe(&err)))
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| StoreError::Rejected {
                key: key.to_string(),
                reason: describe(&err),
            })
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.storage()?
            .remove_item(key)
            .map_err(|err| StoreError::Rejected {
                key: key.to_string(),
                reason: describe(&err),
            })
    }

    fn is_available(&self) -> bool {
        self.storage.is_some()
    }
}
