//! Browser-local key/value persistence.
//!
//! The app keeps three small values between visits: the chosen language, the
//! session access token, and the last opened production project. The `ui` crate
//! implements [`LocalStore`] over `window.localStorage` on the web and over a
//! JSON file in the user's data directory on native builds.
//! [`MemoryLocalStore`] backs the controller tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub trait LocalStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Clone, Debug, Default)]
pub struct MemoryLocalStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryLocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }
}
