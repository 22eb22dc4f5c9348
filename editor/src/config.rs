use std::collections::HashMap;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use jotter_keyboard::{Key, Modifiers, Shortcut};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read or write config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config file {0} must contain a JSON object")]
    NotAnObject(PathBuf),
}

/// Type-safe configuration key that associates a key name with its value type
#[derive(Debug, Clone, Copy)]
pub struct ConfigKey<T> {
    name: &'static str,
    _phantom: PhantomData<T>,
}

impl<T> ConfigKey<T> {
    const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    pub fn key_name(&self) -> &'static str {
        self.name
    }
}

// ===== App Configuration =====

/// App configuration (stored locally)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Origin of the notes backend
    #[serde(alias = "api_base_url")]
    pub api_base_url: String,
    /// Per-request timeout for the notes backend
    #[serde(alias = "request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Quiet period after the last edit before the draft is saved
    #[serde(alias = "autosave_delay_ms")]
    pub autosave_delay_ms: u64,
    /// Key combination that saves immediately (default: CmdOrCtrl+Enter)
    #[serde(alias = "save_shortcut")]
    pub save_shortcut: Shortcut,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            save_shortcut: default_save_shortcut(),
        }
    }
}

impl ConfigKey<AppConfig> {
    pub const APP: Self = Self::new("appConfig");
}

pub fn default_save_shortcut() -> Shortcut {
    Shortcut::cmd_or_ctrl(Modifiers::NONE, Key::Return)
}

// ===== Dictation Configuration =====

/// Options handed to the speech recognizer when dictation starts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DictationConfig {
    /// BCP 47 language tag
    pub language: String,
    /// Keep listening across pauses instead of stopping after one phrase
    pub continuous: bool,
    /// Ask the recognizer for non-final results as well
    #[serde(alias = "interim_results")]
    pub interim_results: bool,
}

impl Default for DictationConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            continuous: true,
            interim_results: true,
        }
    }
}

impl ConfigKey<DictationConfig> {
    pub const DICTATION: Self = Self::new("dictationConfig");
}

// ===== Session Configuration =====

/// Everything a note editing session needs from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub autosave_delay: Duration,
    pub save_shortcut: Shortcut,
    pub dictation: DictationConfig,
}

impl SessionConfig {
    pub fn from_configs(app: &AppConfig, dictation: &DictationConfig) -> Self {
        Self {
            autosave_delay: Duration::from_millis(app.autosave_delay_ms),
            save_shortcut: app.save_shortcut,
            dictation: dictation.clone(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_configs(&AppConfig::default(), &DictationConfig::default())
    }
}

pub fn load_app_config(store: &impl ConfigStore) -> AppConfig {
    store.get(&ConfigKey::APP).unwrap_or_default()
}

pub fn load_dictation_config(store: &impl ConfigStore) -> DictationConfig {
    store.get(&ConfigKey::DICTATION).unwrap_or_default()
}

// ===== Type-Safe Config Store =====

pub trait ConfigStore {
    fn get<T: DeserializeOwned>(&self, key: &ConfigKey<T>) -> Option<T>;
    fn set<T: Serialize>(&self, key: &ConfigKey<T>, value: T) -> Result<(), ConfigError>;
    fn delete<T>(&self, key: &ConfigKey<T>) -> Result<(), ConfigError>;
}

/// Config store persisted as a single pretty-printed JSON object on disk
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: RwLock<HashMap<String, serde_json::Value>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let values = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            match serde_json::from_str::<serde_json::Value>(&raw)? {
                serde_json::Value::Object(map) => map.into_iter().collect(),
                _ => return Err(ConfigError::NotAnObject(path)),
            }
        } else {
            log::debug!("Config file {} not found, using defaults", path.display());
            HashMap::new()
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &HashMap<String, serde_json::Value>) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        // Sorted keys keep the file diff-friendly
        let ordered: std::collections::BTreeMap<_, _> = values.iter().collect();
        let content = serde_json::to_string_pretty(&ordered)?;
        fs::write(&self.path, content).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl ConfigStore for JsonFileStore {
    fn get<T: DeserializeOwned>(&self, key: &ConfigKey<T>) -> Option<T> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        let value = values.get(key.key_name())?.clone();
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                log::warn!("Ignoring invalid config value for {}: {}", key.key_name(), e);
                None
            }
        }
    }

    fn set<T: Serialize>(&self, key: &ConfigKey<T>, value: T) -> Result<(), ConfigError> {
        let val = serde_json::to_value(value)?;
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.key_name().to_string(), val);
        self.persist(&values)
    }

    fn delete<T>(&self, key: &ConfigKey<T>) -> Result<(), ConfigError> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.remove(key.key_name());
        self.persist(&values)
    }
}
