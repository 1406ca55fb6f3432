use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const BASE_URL: &str = "https://14.design.htmlacademy.pro/six-cities";
pub const REQUEST_TIMEOUT_MS: u64 = 5000;

const CONFIG_PATH: &str = "config.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub timeout_ms: u64,
    /// Where the token storage lives. Defaults to the platform data
    /// directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            timeout_ms: REQUEST_TIMEOUT_MS,
            data_dir: None,
        }
    }
}

impl Config {
    /// Read `config.json` from the data directory, then apply the
    /// `SIX_CITIES_*` environment variables on top
    pub fn load() -> Self {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// `SIX_CITIES_DATA_DIR` also decides where `config.json` is read from
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let from_file = Config::default()
            .with_overrides(&lookup)
            .storage_directory()
            .and_then(|dir| super::repository::read::<Config>(&dir.join(CONFIG_PATH)))
            .unwrap_or_else(|e| {
                log::error!("Could not read config: {e}");
                None
            })
            .unwrap_or_default();
        from_file.with_overrides(lookup)
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = lookup("SIX_CITIES_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(timeout) = lookup("SIX_CITIES_TIMEOUT_MS") {
            match timeout.parse() {
                Ok(ms) => self.timeout_ms = ms,
                Err(e) => log::error!("Invalid SIX_CITIES_TIMEOUT_MS {timeout}: {e:?}"),
            }
        }
        if let Some(dir) = lookup("SIX_CITIES_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn storage_directory(&self) -> Result<PathBuf, String> {
        match self.data_dir {
            Some(ref dir) => Ok(dir.clone()),
            None => data_directory(),
        }
    }
}

fn data_directory() -> Result<PathBuf, String> {
    use directories_next::ProjectDirs;
    let Some(proj_dirs) = ProjectDirs::from("com", "six-cities", "six-cities") else {
        return Err("Couldn't find a folder to save data".to_string())
    };
    let dirs = proj_dirs.config_dir().to_path_buf();
    if !dirs.exists() {
        std::fs::create_dir_all(&dirs)
            .map_err(|e| format!("Could not create directory {}: {e:?}", dirs.display()))?;
    }
    Ok(dirs)
}
