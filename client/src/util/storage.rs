//! Browser `localStorage` backend for the token store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session core only sees [`KeyValueStore`]; this adapter centralizes the
//! web-sys glue. Storage failures (private mode, quota) degrade to "absent"
//! rather than erroring, which the session resolves to anonymous.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use campus::KeyValueStore;

/// Handle to `window.localStorage`. Outside the browser every read misses and
/// writes are dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStore;

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Log a failed `localStorage` call. Returns whether it failed.
#[cfg_attr(not(feature = "csr"), allow(dead_code))]
fn warn_on_failure<E>(result: Result<(), E>, action: &str, key: &str) -> bool {
    let failed = result.is_err();
    #[cfg(feature = "csr")]
    if failed {
        log::warn!("localStorage {action} failed for {key}");
    }
    #[cfg(not(feature = "csr"))]
    let _ = (action, key);
    failed
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(feature = "csr")]
        {
            local_storage()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            None
        }
    }

    fn set(&self, key: &str, value: &str) {
        #[cfg(feature = "csr")]
        {
            if let Some(storage) = local_storage() {
                warn_on_failure(storage.set_item(key, value), "write", key);
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (key, value);
        }
    }

    fn remove(&self, key: &str) {
        #[cfg(feature = "csr")]
        {
            if let Some(storage) = local_storage() {
                warn_on_failure(storage.remove_item(key), "remove", key);
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
        }
    }
}
