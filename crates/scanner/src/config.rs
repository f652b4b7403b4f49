//! Per-root configuration
//!
//! Every path the scanner touches is derived here once per invocation and
//! passed down explicitly.

use crate::error::ConfigError;
use crate::ignore::IgnoreConfig;
use cedge_ledger::DEFAULT_HOST_NODE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

/// State directory at the root of a tracked tree
pub const STATE_DIR: &str = ".cedge";

/// Optional config file inside [`STATE_DIR`]
pub const CONFIG_FILE: &str = "config.toml";

/// Resolved configuration for one root
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory whose top-level subdirectories are projects
    pub root: PathBuf,
    /// `.cedge/diff`
    pub ledger_dir: PathBuf,
    /// `.cedge/tracked/tracked.json`
    pub registry_path: PathBuf,
    /// Host recorded in a new registry
    pub host_node: String,
    pub ignore: IgnoreConfig,
}

/// On-disk shape of `.cedge/config.toml`
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    host_node: Option<String>,
    #[serde(default)]
    ignore: IgnoreConfig,
}

impl Config {
    /// Default configuration for `root`
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let state = root.join(STATE_DIR);
        Self {
            ledger_dir: state.join("diff"),
            registry_path: state.join("tracked").join("tracked.json"),
            host_node: DEFAULT_HOST_NODE.to_string(),
            ignore: IgnoreConfig::default(),
            root,
        }
    }

    /// Configuration for `root`, overlaid with `.cedge/config.toml` if present
    pub fn load(root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::for_root(root);
        let path = config.config_path();

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(config),
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        let file: ConfigFile =
            toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })?;
        if let Some(host_node) = file.host_node {
            config.host_node = host_node;
        }
        config.ignore = file.ignore;

        config.validate()?;
        Ok(config)
    }

    /// `host_node` must be an absolute http(s) URL with a host
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = || ConfigError::HostNode(self.host_node.clone());
        let url = Url::parse(&self.host_node).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
            return Err(invalid());
        }
        Ok(())
    }

    pub fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.state_dir().join(CONFIG_FILE)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.state_dir().join("logs")
    }

    /// Root-relative, `/`-separated name for `path`
    ///
    /// Returns `None` for paths outside the root or with non-UTF-8 names.
    pub fn relative_name(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts = rel
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?;
        Some(parts.join("/"))
    }
}
