//! Browser Storage
//!
//! `KeyValueStore` over `window.localStorage`, `document.cookie` and the
//! window `storage` event.

use task_client::{ApiError, ChangeListener, KeyValueStore, StorageChange, Subscription};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl BrowserStore {
    fn local_storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

/// Cookie string that makes the browser drop `name` immediately.
pub fn expired_cookie(name: &str) -> String {
    format!("{}=; path=/; expires=Thu, 01 Jan 1970 00:00:00 GMT; SameSite=Lax", name)
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::local_storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        let storage = Self::local_storage()
            .ok_or_else(|| ApiError::Storage("localStorage is unavailable".to_string()))?;
        storage
            .set_item(key, value)
            .map_err(|e| ApiError::Storage(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::local_storage() {
            let _ = storage.remove_item(key);
        }
    }

    fn expire_cookie(&self, name: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Ok(html) = document.dyn_into::<web_sys::HtmlDocument>() {
            let _ = html.set_cookie(&expired_cookie(name));
        }
    }

    fn subscribe(&self, listener: ChangeListener) -> Subscription {
        let Some(window) = web_sys::window() else {
            return Subscription::noop();
        };

        let on_storage = Closure::<dyn FnMut(web_sys::StorageEvent)>::new(move |ev: web_sys::StorageEvent| {
            listener(StorageChange {
                key: ev.key(),
                new_value: ev.new_value(),
            });
        });

        if let Err(e) = window.add_event_listener_with_callback("storage", on_storage.as_ref().unchecked_ref()) {
            log::warn!("[STORAGE] Could not listen for storage events: {:?}", e);
            return Subscription::noop();
        }

        Subscription::new(move || {
            let _ = window.remove_event_listener_with_callback("storage", on_storage.as_ref().unchecked_ref());
        })
    }
}
