use std::path::{Path, PathBuf};

use rtid_chainparams::DeploymentOverride;
use serde::{Deserialize, Serialize};

use crate::error::NodeError;

/// File name written by [`NodeConfig::init`].
pub const CONFIG_FILE_NAME: &str = "rtid.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Network to select: "main", "test", or "regtest".
    #[serde(default = "default_network")]
    pub network: String,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Deployment windows to force on regtest.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deployment_overrides: Vec<DeploymentOverride>,
}

fn default_network() -> String {
    "main".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            logging: LoggingConfig::default(),
            deployment_overrides: Vec::new(),
        }
    }
}

impl NodeConfig {
    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| config_error("read", path, e))?;
        toml::from_str(&text).map_err(|e| config_error("parse", path, e))
    }

    /// Load `path` if given, otherwise start from the defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self, NodeError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Write the default config as [`CONFIG_FILE_NAME`] inside `dir`, creating
    /// `dir` if needed. Returns the path of the written file.
    pub fn init(dir: impl AsRef<Path>) -> Result<PathBuf, NodeError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let path = dir.join(CONFIG_FILE_NAME);
        let text = toml::to_string_pretty(&Self::default())
            .map_err(|e| config_error("render", &path, e))?;
        std::fs::write(&path, text)?;
        Ok(path)
    }
}

fn config_error(action: &str, path: &Path, err: impl std::fmt::Display) -> NodeError {
    NodeError::ConfigError {
        reason: format!("cannot {} config '{}': {}", action, path.display(), err),
    }
}
