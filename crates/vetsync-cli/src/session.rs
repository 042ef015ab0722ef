//! CLI session persistence.
//!
//! The API token lives in the OS keyring; non-secret profile fields
//! (user id, display name, role) live in a JSON file under the config
//! directory. Secrets must never land in the profile file.

use std::path::{Path, PathBuf};

use keyring::Entry;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

const KEYRING_SERVICE_NAME: &str = "vetsync";
const KEYRING_TOKEN_USERNAME: &str = "api_token";
const PROFILE_FILE_NAME: &str = "profile.json";

/// Non-secret identity persisted between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_role: Option<String>,
}

impl Profile {
    pub fn load() -> Result<Self, CliError> {
        Self::load_from_path(&default_profile_path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self) -> Result<PathBuf, CliError> {
        let path = default_profile_path();
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), CliError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string_pretty(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    pub fn clear() -> Result<(), CliError> {
        let path = default_profile_path();
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

pub fn default_profile_path() -> PathBuf {
    dirs::config_dir()
        .map_or_else(|| PathBuf::from(".vetsync"), |dir| dir.join("vetsync"))
        .join(PROFILE_FILE_NAME)
}

/// API token store backed by the OS keyring (`keyring` crate).
#[derive(Debug, Clone)]
pub struct TokenStore {
    service_name: String,
    username: String,
}

impl Default for TokenStore {
    fn default() -> Self {
        Self {
            service_name: KEYRING_SERVICE_NAME.to_string(),
            username: KEYRING_TOKEN_USERNAME.to_string(),
        }
    }
}

impl TokenStore {
    fn entry(&self) -> Result<Entry, CliError> {
        Entry::new(&self.service_name, &self.username)
            .map_err(|error| CliError::SecureStorage(error.to_string()))
    }

    pub fn load(&self) -> Result<Option<String>, CliError> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(CliError::SecureStorage(error.to_string())),
        }
    }

    pub fn save(&self, token: &str) -> Result<(), CliError> {
        self.entry()?
            .set_password(token)
            .map_err(|error| CliError::SecureStorage(error.to_string()))
    }

    pub fn clear(&self) -> Result<(), CliError> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(CliError::SecureStorage(error.to_string())),
        }
    }
}
