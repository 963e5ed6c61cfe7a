//! Platform [`LocalStore`] implementations.
//!
//! - **Web** (WASM): `window.localStorage`
//! - **Desktop / native**: a JSON file under `<data_dir>/proyecto301/local.json`

use api::local::LocalStore;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStorage as PlatformStore;
#[cfg(not(target_arch = "wasm32"))]
pub use native::FileLocalStore as PlatformStore;

/// Create the platform store.
pub fn platform_store() -> PlatformStore {
    #[cfg(target_arch = "wasm32")]
    {
        PlatformStore::default()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let path = dirs::data_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("proyecto301")
            .join("local.json");
        PlatformStore::open(path)
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::LocalStore;

    #[derive(Clone, Debug, Default)]
    pub struct BrowserStorage;

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    impl LocalStore for BrowserStorage {
        fn get(&self, key: &str) -> Option<String> {
            storage()?.get_item(key).ok().flatten()
        }

        fn set(&self, key: &str, value: &str) {
            if let Some(s) = storage() {
                if s.set_item(key, value).is_err() {
                    tracing::warn!("localStorage rejected {}", key);
                }
            }
        }

        fn remove(&self, key: &str) {
            if let Some(s) = storage() {
                let _ = s.remove_item(key);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use super::LocalStore;

    #[derive(Clone, Debug)]
    pub struct FileLocalStore {
        path: PathBuf,
        values: Arc<Mutex<BTreeMap<String, String>>>,
    }

    impl FileLocalStore {
        /// Load `path` if it exists. A missing or unreadable file starts empty.
        pub fn open(path: PathBuf) -> Self {
            let values = std::fs::read_to_string(&path)
                .ok()
                .and_then(|raw| serde_json::from_str(&raw).ok())
                .unwrap_or_default();
            Self {
                path,
                values: Arc::new(Mutex::new(values)),
            }
        }

        fn persist(&self, values: &BTreeMap<String, String>) {
            if let Some(dir) = self.path.parent() {
                if let Err(e) = std::fs::create_dir_all(dir) {
                    tracing::warn!("Cannot create {}: {}", dir.display(), e);
                    return;
                }
            }
            let result = serde_json::to_string_pretty(values)
                .map_err(|e| e.to_string())
                .and_then(|json| std::fs::write(&self.path, json).map_err(|e| e.to_string()));
            if let Err(e) = result {
                tracing::warn!("Cannot write {}: {}", self.path.display(), e);
            }
        }
    }

    impl LocalStore for FileLocalStore {
        fn get(&self, key: &str) -> Option<String> {
            self.values
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get(key)
                .cloned()
        }

        fn set(&self, key: &str, value: &str) {
            let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
            values.insert(key.to_string(), value.to_string());
            self.persist(&values);
        }

        fn remove(&self, key: &str) {
            let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
            if values.remove(key).is_some() {
                self.persist(&values);
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_values_survive_reopen() {
            let path = std::env::temp_dir()
                .join(format!("p301-local-{}", std::process::id()))
                .join("local.json");
            let store = FileLocalStore::open(path.clone());
            store.set("p301.language", "en");
            store.set("p301.current_project", "p1");
            store.remove("p301.current_project");

            let reopened = FileLocalStore::open(path.clone());
            assert_eq!(reopened.get("p301.language").as_deref(), Some("en"));
            assert_eq!(reopened.get("p301.current_project"), None);

            let _ = std::fs::remove_dir_all(path.parent().unwrap());
        }
    }
}
