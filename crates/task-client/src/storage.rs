//! Persistent Client Storage
//!
//! Key-value storage for the session (token + cached user), cookie expiry,
//! and change notifications from other tabs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::error::ApiError;

/// Storage key holding the bearer token
pub const TOKEN_KEY: &str = "auth_token";
/// Storage key holding the JSON-serialized `User`
pub const USER_KEY: &str = "logged_in_user";
/// Cookie mirroring the token, expired on logout
pub const TOKEN_COOKIE: &str = "auth_token";

/// A write made by another tab.
///
/// `key == None` means the other tab cleared the whole storage area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub key: Option<String>,
    pub new_value: Option<String>,
}

pub type ChangeListener = Box<dyn Fn(StorageChange)>;

/// Handle for a change listener; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Subscription that has nothing to tear down.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Keep the listener for the rest of the page's life.
    pub fn keep_alive(mut self) {
        self.cancel = None;
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), ApiError>;
    fn remove(&self, key: &str);
    /// Expire a cookie by name (path `/`).
    fn expire_cookie(&self, name: &str);
    /// Listen for writes made by other tabs. Own writes are not reported.
    fn subscribe(&self, listener: ChangeListener) -> Subscription;
}

/// In-memory store. Shares state between clones.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    cookies: HashMap<String, String>,
    listeners: Vec<(u64, Rc<dyn Fn(StorageChange)>)>,
    next_listener: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Test support: cookies and writes from other tabs.
#[cfg(test)]
impl MemoryStore {
    pub fn set_cookie(&self, name: &str, value: &str) {
        self.inner
            .borrow_mut()
            .cookies
            .insert(name.to_string(), value.to_string());
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        self.inner.borrow().cookies.get(name).cloned()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Apply a write as if another tab made it, notifying listeners.
    pub fn external_write(&self, key: &str, value: Option<&str>) {
        {
            let mut inner = self.inner.borrow_mut();
            match value {
                Some(v) => inner.values.insert(key.to_string(), v.to_string()),
                None => inner.values.remove(key),
            };
        }
        self.notify(StorageChange {
            key: Some(key.to_string()),
            new_value: value.map(str::to_string),
        });
    }

    /// Another tab called `localStorage.clear()`.
    pub fn external_clear(&self) {
        self.inner.borrow_mut().values.clear();
        self.notify(StorageChange {
            key: None,
            new_value: None,
        });
    }

    fn notify(&self, change: StorageChange) {
        // Snapshot so listeners may touch the store.
        let listeners: Vec<_> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(change.clone());
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.borrow().values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.inner
            .borrow_mut()
            .values
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.inner.borrow_mut().values.remove(key);
    }

    fn expire_cookie(&self, name: &str) {
        self.inner.borrow_mut().cookies.remove(name);
    }

    fn subscribe(&self, listener: ChangeListener) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_listener;
            inner.next_listener += 1;
            inner.listeners.push((id, Rc::from(listener)));
            id
        };

        let weak: Weak<RefCell<MemoryInner>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
            }
        })
    }
}
