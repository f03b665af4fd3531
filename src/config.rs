//! Configuration file handling for budgety.
//!
//! The configuration file is stored at `$BUDGETY_HOME/config.json`. It holds the settings that
//! shape a session: how entry ids are assigned and which currency symbol the page shows. Entries
//! themselves are never written to disk.

use crate::store::IdPolicy;
use crate::{utils, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "budgety";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$BUDGETY_HOME` and from there it loads `$BUDGETY_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, if needed, and writes an initial `config.json` into it.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    pub async fn create(
        dir: impl Into<PathBuf>,
        id_policy: IdPolicy,
        currency_symbol: &str,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the budgety home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);

        let config_file = ConfigFile {
            id_policy,
            currency_symbol: currency_symbol.to_string(),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `budgety_home` exists and that the config file exists
    /// - load the config file
    /// - return the loaded configuration object
    pub async fn load(budgety_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = budgety_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Budgety Home is missing")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            anyhow::bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// Loads the config from `budgety_home` when a config file is there. Otherwise returns the
    /// default settings without creating anything on disk.
    pub async fn load_or_default(budgety_home: impl Into<PathBuf>) -> Result<Self> {
        let root = budgety_home.into();
        let config_path = root.join(CONFIG_JSON);
        if config_path.is_file() {
            return Self::load(root).await;
        }
        debug!(
            "No config file at '{}', using default settings",
            config_path.display()
        );
        Ok(Self {
            root,
            config_path,
            config_file: ConfigFile::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn id_policy(&self) -> IdPolicy {
        self.config_file.id_policy
    }

    pub fn currency_symbol(&self) -> &str {
        &self.config_file.currency_symbol
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "budgety",
///   "config_version": 1,
///   "id_policy": "last_plus_one",
///   "currency_symbol": "$"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "budgety"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// How entry ids are assigned
    #[serde(default)]
    id_policy: IdPolicy,

    /// Printed in front of every money value on the page
    #[serde(default = "default_currency_symbol")]
    currency_symbol: String,
}

fn default_currency_symbol() -> String {
    crate::model::DEFAULT_SYMBOL.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            id_policy: IdPolicy::default(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
