use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{from_slice, to_string_pretty};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Key under which the auth token is persisted
pub const TOKEN_KEY_NAME: &str = "six-cities-token";

const STORAGE_PATH: &str = "storage.json";

type Storage = HashMap<String, String>;

/// Owns the persisted auth token. Every reader and writer (the request
/// decorator, the 401 handling, login and logout) goes through here.
#[derive(Clone)]
pub struct Repository {
    storage: Arc<Mutex<Storage>>,
    location: Option<PathBuf>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("location", &self.location)
            .field("has_token", &self.token().is_some())
            .finish()
    }
}

impl Repository {
    /// A repository persisted as JSON inside `directory`
    pub fn new(directory: &Path) -> Self {
        let location = directory.join(STORAGE_PATH);
        let storage = match read(&location) {
            Ok(storage) => storage.unwrap_or_default(),
            Err(e) => {
                log::error!("Could not load storage: {e}");
                Storage::default()
            }
        };
        Self {
            storage: Arc::new(Mutex::new(storage)),
            location: Some(location),
        }
    }

    /// A repository that never touches the disk
    pub fn in_memory() -> Self {
        Self {
            storage: Arc::default(),
            location: None,
        }
    }

    pub fn token(&self) -> Option<String> {
        self.storage
            .lock()
            .ok()?
            .get(TOKEN_KEY_NAME)
            .filter(|token| !token.is_empty())
            .cloned()
    }

    pub fn set_token(&self, token: &str) -> Result<(), String> {
        self.map_storage(|storage| {
            storage.insert(TOKEN_KEY_NAME.to_string(), token.to_string());
        })
    }

    pub fn clear_token(&self) -> Result<(), String> {
        self.map_storage(|storage| {
            storage.remove(TOKEN_KEY_NAME);
        })
    }

    fn map_storage(&self, action: impl FnOnce(&mut Storage)) -> Result<(), String> {
        let mut storage = self
            .storage
            .lock()
            .map_err(|e| format!("Storage Data Error: {e:?}"))?;
        action(&mut storage);
        if let Some(ref location) = self.location {
            write(location, &*storage)?;
        }
        Ok(())
    }
}

pub(crate) fn read<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, String> {
    if !path.exists() {
        return Ok(None);
    };
    let data =
        std::fs::read(path).map_err(|e| format!("Could not read {}: {e:?}", path.display()))?;
    let obj: T =
        from_slice(&data).map_err(|e| format!("Could not parse {}: {e:?}", path.display()))?;
    Ok(Some(obj))
}

pub(crate) fn write<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Could not create directory {}: {e:?}", parent.display()))?;
        }
    }
    let data = to_string_pretty(&value).map_err(|e| format!("Could not parse value:{e:?}"))?;
    std::fs::write(path, data)
        .map_err(|e| format!("Could not write to {}: {e:?}", path.display()))?;
    Ok(())
}
