use poll_core::{KeyValueStore, StoreError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// `window.localStorage`, scoped by the browser to this viewer and device.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStore;

impl LocalStore {
    fn storage() -> Result<Storage, StoreError> {
        let window = web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("window not available".into()))?;
        window
            .local_storage()
            .map_err(unavailable)?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".into()))
    }
}

fn unavailable(e: JsValue) -> StoreError {
    StoreError::Unavailable(format!("{e:?}"))
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::storage()?.get_item(key).map_err(unavailable)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::storage()?.set_item(key, value).map_err(unavailable)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        Self::storage()?.remove_item(key).map_err(unavailable)
    }
}
