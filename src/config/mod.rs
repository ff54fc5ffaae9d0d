//! Configuration management for kit-deps
//!
//! kit-deps reads an optional TOML file that controls where the module index
//! lives, which files count as sources and how much work runs concurrently.
//!
//! # Location
//!
//! The first of these wins:
//! 1. `--config <FILE>` on the command line
//! 2. the `KIT_CONFIG` environment variable
//! 3. `~/.kit/config.toml`
//!
//! An explicitly named file must exist. The default file is optional; when it
//! is absent every setting takes its default.
//!
//! # Format
//!
//! ```toml
//! # Module index root, one sub-directory per module
//! index = "~/.kit/modules"
//!
//! # Source extensions to scan
//! extensions = ["c", "h", "cpp", "hpp"]
//!
//! # Concurrent file reads / module expansions
//! max_parallel = 16
//! ```
//!
//! The index root can also be overridden by `--index` or `KIT_INDEX`, and
//! parallelism by `--max-parallel`. Index paths may start with `~` and may
//! reference environment variables (`$HOME/kit`, `${KIT_ROOT}/modules`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_SOURCE_EXTENSIONS, KIT_HOME_DIR, MODULE_INDEX_DIR, default_max_parallel,
};
use crate::core::KitError;
use crate::sources::ExtensionFilter;

/// Settings loaded from the kit-deps configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KitConfig {
    /// Module index root. `None` means `~/.kit/modules`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<PathBuf>,

    /// Source file extensions, without the leading dot.
    pub extensions: Vec<String>,

    /// Upper bound on concurrent work. `None` means a CPU-based default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_parallel: Option<usize>,
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            index: None,
            extensions: DEFAULT_SOURCE_EXTENSIONS.iter().map(ToString::to_string).collect(),
            max_parallel: None,
        }
    }
}

impl KitConfig {
    /// Default configuration file location (`~/.kit/config.toml`).
    pub fn default_path() -> Result<PathBuf> {
        Ok(kit_home()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration following the documented lookup order.
    ///
    /// `explicit` is the `--config` flag; `env_path` is the value of
    /// `KIT_CONFIG`, if set.
    pub async fn load_with_optional(explicit: Option<PathBuf>, env_path: Option<String>) -> Result<Self> {
        if let Some(path) = explicit.or_else(|| env_path.filter(|p| !p.is_empty()).map(PathBuf::from)) {
            if !path.is_file() {
                return Err(KitError::ConfigError {
                    message: format!("Configuration file not found: {}", path.display()),
                }
                .into());
            }
            return Self::load_from(&path).await;
        }

        let path = Self::default_path()?;
        if path.is_file() {
            Self::load_from(&path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .map_err(KitError::from)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(KitError::ConfigError {
                message: "'extensions' must list at least one source extension".to_string(),
            }
            .into());
        }
        if self.max_parallel == Some(0) {
            return Err(KitError::ConfigError {
                message: "'max_parallel' must be at least 1".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// The module index root, with `~` and environment variables expanded.
    ///
    /// Precedence: `flag`, then `env_index` (`KIT_INDEX`), then the `index`
    /// key, then `~/.kit/modules`.
    pub fn index_root(&self, flag: Option<&Path>, env_index: Option<&str>) -> Result<PathBuf> {
        if let Some(path) = flag {
            return expand_path(path);
        }
        if let Some(path) = env_index.filter(|p| !p.is_empty()) {
            return expand_path(Path::new(path));
        }
        match &self.index {
            Some(path) => expand_path(path),
            None => Ok(kit_home()?.join(MODULE_INDEX_DIR)),
        }
    }

    /// Effective parallelism, preferring `flag` over the `max_parallel` key.
    pub fn max_parallel(&self, flag: Option<usize>) -> usize {
        flag.or(self.max_parallel).unwrap_or_else(default_max_parallel).max(1)
    }

    /// Source filter built from the `extensions` key.
    pub fn source_filter(&self) -> ExtensionFilter {
        ExtensionFilter::new(self.extensions.iter().cloned())
    }
}

fn kit_home() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| KitError::ConfigError {
        message: "Unable to determine home directory".to_string(),
    })?;
    Ok(home.join(KIT_HOME_DIR))
}

/// Expand a leading `~` and `$VAR` / `${VAR}` references in a configured path.
fn expand_path(path: &Path) -> Result<PathBuf> {
    let Some(raw) = path.to_str() else {
        return Ok(path.to_path_buf());
    };
    let expanded = shellexpand::full(raw).map_err(|e| KitError::ConfigError {
        message: format!("Failed to expand path '{raw}': {e}"),
    })?;
    Ok(PathBuf::from(expanded.as_ref()))
}
