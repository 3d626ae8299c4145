//! Durable token and cached-user persistence.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser persists under `localStorage`, the CLI under a JSON file; both
//! plug in through [`KeyValueStore`]. Only the session manager calls the
//! mutating operations, so "last write wins" is the whole locking story.
//!
//! ERROR HANDLING
//! ==============
//! Reads never fail: absent or malformed values read as `None`. Backend write
//! failures are the backend's to log; the store itself stays infallible.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::types::{TokenPair, UserProfile};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

/// Minimal string key/value backend.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-process backend. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Typed view over a [`KeyValueStore`] for the three session keys.
#[derive(Clone, Debug)]
pub struct TokenStore<S> {
    backend: S,
}

impl<S: KeyValueStore> TokenStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn get_tokens(&self) -> TokenPair {
        TokenPair {
            access_token: self.backend.get(ACCESS_TOKEN_KEY),
            refresh_token: self.backend.get(REFRESH_TOKEN_KEY),
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.backend.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.backend.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn set_tokens(&self, access: &str, refresh: &str) {
        self.backend.set(ACCESS_TOKEN_KEY, access);
        self.backend.set(REFRESH_TOKEN_KEY, refresh);
    }

    /// Clear tokens and the cached user. Safe to call repeatedly.
    pub fn remove_tokens(&self) {
        self.backend.remove(ACCESS_TOKEN_KEY);
        self.backend.remove(REFRESH_TOKEN_KEY);
        self.backend.remove(USER_KEY);
    }

    pub fn get_user(&self) -> Option<UserProfile> {
        let raw = self.backend.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed cached user");
                None
            }
        }
    }

    pub fn set_user(&self, user: &UserProfile) {
        match serde_json::to_string(user) {
            Ok(raw) => self.backend.set(USER_KEY, &raw),
            Err(e) => tracing::warn!(error = %e, "failed to serialize user for cache"),
        }
    }
}
