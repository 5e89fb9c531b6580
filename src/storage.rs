use std::fs;
use std::path::{Path, PathBuf};

use crate::crypto;
use crate::models::AppData;

const APP_DIR: &str = "period-diary";
const VAULT_FILE: &str = "diary.vault";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("crypto error: {0}")]
    Crypto(#[from] crypto::CryptoError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("data directory not found")]
    NoDataDir,
}

/// The encrypted file holding cycle history and settings.
#[derive(Debug, Clone)]
pub struct Vault {
    path: PathBuf,
}

impl Vault {
    /// Vault in the platform's local data directory.
    pub fn default_location() -> Result<Self, StorageError> {
        let dir = dirs::data_local_dir()
            .ok_or(StorageError::NoDataDir)?
            .join(APP_DIR);
        Ok(Self::at(dir.join(VAULT_FILE)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the diary has been set up on this machine.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn save(&self, passphrase: &str, data: &AppData) -> Result<(), StorageError> {
        let json = serde_json::to_vec(data)?;
        let sealed = crypto::seal(passphrase, &json)?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, sealed)?;
        tracing::debug!(path = %self.path.display(), cycles = data.cycles.len(), "vault saved");
        Ok(())
    }

    pub fn load(&self, passphrase: &str) -> Result<AppData, StorageError> {
        let sealed = fs::read(&self.path)?;
        let json = crypto::open(passphrase, &sealed)?;
        let data: AppData = serde_json::from_slice(&json)?;
        tracing::debug!(path = %self.path.display(), cycles = data.cycles.len(), "vault loaded");
        Ok(data)
    }

    /// Delete the vault permanently.
    pub fn wipe(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            tracing::info!(path = %self.path.display(), "vault wiped");
        }
        Ok(())
    }
}
