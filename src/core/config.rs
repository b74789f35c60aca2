// src/core/config.rs

//! Resolver configuration (`toolopts.toml`).

use crate::constants::{PACKAGES_DIR_ENV, RESOLVER_CONFIG_FILENAME};
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings of the tool path resolver, read from `toolopts.toml`.
///
/// ```toml
/// packages_dir = "~/.nuget/packages"
/// search_path = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Root of the installed packages. Supports `~` and `$VAR` expansion.
    pub packages_dir: Option<String>,
    /// Whether search-path descriptors may look executables up on `PATH`.
    pub search_path: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            packages_dir: None,
            search_path: true,
        }
    }
}

impl ResolverConfig {
    /// Loads the configuration from an explicit file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read resolver config '{}'", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse resolver config '{}'", path.display()))?;
        log::debug!("Loaded resolver config from '{}'", path.display());
        Ok(config.with_env_overrides())
    }

    /// Loads `~/.config/toolopts/toolopts.toml` if it exists, defaults otherwise.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => {
                log::trace!("No resolver config file found, using defaults.");
                Ok(Self::default().with_env_overrides())
            }
        }
    }

    /// Location of the default config file, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("toolopts").join(RESOLVER_CONFIG_FILENAME))
    }

    /// Applies `TOOLOPTS_PACKAGES_DIR` on top of the file values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var(PACKAGES_DIR_ENV)
            && !dir.trim().is_empty()
        {
            log::debug!("Packages directory overridden by {}: '{}'", PACKAGES_DIR_ENV, dir);
            self.packages_dir = Some(dir);
        }
        self
    }

    /// The expanded packages directory, if one is configured.
    pub fn packages_dir(&self) -> Result<Option<PathBuf>> {
        let Some(template) = &self.packages_dir else {
            return Ok(None);
        };
        let expanded = shellexpand::full(template)
            .map_err(|e| anyhow!("Failed to expand packages directory '{}': {}", template, e))?;
        Ok(Some(PathBuf::from(expanded.into_owned())))
    }
}
