//! Configuration file handling for fintrack.
//!
//! The configuration file is stored at `$FINTRACK_HOME/config.json`. It names the storage backend,
//! the data file, and the currency label used when amounts are displayed.

use crate::db::Db;
use crate::error::{ErrorType, IntoResult, Res, Result};
use crate::storage::{JsonFileStorage, Storage, StorageKind};
use crate::utils;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "fintrack";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
/// The currency label used when none is configured.
pub const DEFAULT_CURRENCY: &str = "MAD";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$FINTRACK_HOME` and from there it loads `$FINTRACK_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    data_path: PathBuf,
}

impl Config {
    /// Creates the home directory, writes an initial `config.json`, and creates an empty data file
    /// for `storage`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the home directory, e.g. `$HOME/fintrack`
    /// - `storage` - Which backend to keep transactions in.
    /// - `currency` - The label shown in front of amounts, e.g. `MAD`.
    ///
    /// # Errors
    /// - Returns a `Config` error if the home directory already holds a `config.json`.
    /// - Returns a `Storage` error if the data file cannot be created.
    pub async fn create(
        dir: impl Into<PathBuf>,
        storage: StorageKind,
        currency: &str,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        let root = prepare_home(&maybe_relative)
            .await
            .pub_result(ErrorType::Config)?;
        let config_path = root.join(CONFIG_JSON);

        let config_file = ConfigFile {
            storage,
            currency: currency.trim().to_string(),
            ..ConfigFile::default()
        };
        config_file
            .save(&config_path)
            .await
            .pub_result(ErrorType::Config)?;

        let data_path = config_file.data_path(&root);
        let created = match storage {
            StorageKind::Sqlite => Db::init(&data_path).await.map(|_| ()),
            StorageKind::Json => JsonFileStorage::init(&data_path).await.map(|_| ()),
        };
        created
            .with_context(|| format!("Unable to create the {storage} data file"))
            .pub_result(ErrorType::Storage)?;
        debug!("Created {} with {storage} storage", root.display());

        Ok(Self {
            root,
            config_path,
            config_file,
            data_path,
        })
    }

    /// This will
    /// - validate that the home directory exists and that the config file exists
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        Self::load_inner(&maybe_relative)
            .await
            .pub_result(ErrorType::Config)
    }

    async fn load_inner(home: &Path) -> Res<Self> {
        let root = utils::canonicalize(home)
            .await
            .context("The fintrack home directory is missing, run 'fintrack init' first")?;
        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let data_path = config_file.data_path(&root);
        Ok(Self {
            root,
            config_path,
            config_file,
            data_path,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn currency(&self) -> &str {
        &self.config_file.currency
    }

    pub fn storage_kind(&self) -> StorageKind {
        self.config_file.storage
    }

    /// The resolved path of the data file.
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Opens the configured storage backend.
    ///
    /// # Errors
    /// Returns a `Storage` error if the SQLite database cannot be opened or migrated.
    pub async fn open_storage(&self) -> Result<Box<dyn Storage>> {
        match self.storage_kind() {
            StorageKind::Sqlite => {
                let db = Db::load(&self.data_path)
                    .await
                    .context("Unable to load SQLite DB")
                    .pub_result(ErrorType::Storage)?;
                Ok(Box::new(db))
            }
            StorageKind::Json => Ok(Box::new(JsonFileStorage::new(&self.data_path))),
        }
    }
}

async fn prepare_home(dir: &Path) -> Res<PathBuf> {
    utils::make_dir(dir)
        .await
        .context("Unable to create the fintrack home directory")?;
    let root = utils::canonicalize(dir).await?;
    let config_path = root.join(CONFIG_JSON);
    if utils::exists(&config_path).await? {
        bail!(
            "'{}' already exists, refusing to overwrite it",
            config_path.display()
        );
    }
    Ok(root)
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "fintrack",
///   "config_version": 1,
///   "currency": "MAD",
///   "storage": "sqlite",
///   "data_path": "fintrack.sqlite"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "fintrack"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Display label placed in front of amounts
    #[serde(default = "default_currency")]
    currency: String,

    #[serde(default)]
    storage: StorageKind,

    /// Path to the data file (optional, relative to the home directory or absolute).
    /// Defaults to a file name that depends on `storage`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_path: Option<PathBuf>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            currency: default_currency(),
            storage: StorageKind::default(),
            data_path: None,
        }
    }
}

impl ConfigFile {
    async fn load(path: &Path) -> Res<Self> {
        let config: ConfigFile = utils::deserialize(path).await?;
        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version <= CONFIG_VERSION,
            "Config file version {} is newer than this program supports ({})",
            config.config_version,
            CONFIG_VERSION
        );
        Ok(config)
    }

    async fn save(&self, path: &Path) -> Res<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path, data)
            .await
            .context("Unable to write config file")
    }

    /// Resolves the data file against `root`, falling back to the default for the storage kind.
    fn data_path(&self, root: &Path) -> PathBuf {
        match &self.data_path {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => root.join(p),
            None => root.join(self.storage.default_file_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_sqlite_then_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("fintrack_home");
        let created = Config::create(&home, StorageKind::Sqlite, "MAD")
            .await
            .unwrap();
        assert!(created.config_path().is_file());
        assert!(created.data_path().is_file());
        assert!(created.data_path().ends_with("fintrack.sqlite"));

        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(loaded.currency(), "MAD");
        assert_eq!(loaded.storage_kind(), StorageKind::Sqlite);
        assert_eq!(loaded.data_path(), created.data_path());
        let mut storage = loaded.open_storage().await.unwrap();
        assert!(storage.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_json() {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path(), StorageKind::Json, "EUR")
            .await
            .unwrap();
        assert!(config.data_path().ends_with("transactions.json"));
        assert_eq!(utils::read(config.data_path()).await.unwrap(), "[]");
        assert_eq!(Config::load(dir.path()).await.unwrap().currency(), "EUR");
    }

    #[tokio::test]
    async fn test_create_refuses_existing_home() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path(), StorageKind::Json, "MAD")
            .await
            .unwrap();
        let e = Config::create(dir.path(), StorageKind::Json, "MAD")
            .await
            .unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Config);
    }

    #[tokio::test]
    async fn test_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let e = Config::load(dir.path().join("nope")).await.unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Config);
        assert!(e.to_string().contains("fintrack init"), "{e}");
    }

    #[tokio::test]
    async fn test_load_minimal_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        utils::write(&path, r#"{ "app_name": "fintrack", "config_version": 1 }"#)
            .await
            .unwrap();
        let config = Config::load(dir.path()).await.unwrap();
        assert_eq!(config.currency(), DEFAULT_CURRENCY);
        assert_eq!(config.storage_kind(), StorageKind::Sqlite);
    }

    #[tokio::test]
    async fn test_load_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        utils::write(&path, r#"{ "app_name": "budgeteer", "config_version": 1 }"#)
            .await
            .unwrap();
        let e = Config::load(dir.path()).await.unwrap_err();
        assert!(e.to_string().contains("Invalid app_name"), "{e}");
    }

    #[test]
    fn test_relative_and_absolute_data_paths() {
        let root = Path::new("/home/someone/fintrack");
        let mut file = ConfigFile {
            data_path: Some(PathBuf::from("data/ledger.json")),
            storage: StorageKind::Json,
            ..ConfigFile::default()
        };
        assert_eq!(file.data_path(root), root.join("data/ledger.json"));
        file.data_path = Some(PathBuf::from("/var/ledger.json"));
        assert_eq!(file.data_path(root), PathBuf::from("/var/ledger.json"));
        file.data_path = None;
        assert_eq!(file.data_path(root), root.join("transactions.json"));
    }

    #[test]
    fn test_serialization_omits_data_path() {
        let json = serde_json::to_string(&ConfigFile::default()).unwrap();
        assert!(!json.contains("data_path"));
        assert!(json.contains(r#""storage":"sqlite""#));
    }
}
