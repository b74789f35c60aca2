// src/core/resolver.rs

//! # Tool Path Resolver
//!
//! Determines the executable for an options value. Steps are tried in a fixed
//! order and the first one that yields a path wins:
//!
//! 1. the `ProcessToolPath` override, returned verbatim;
//! 2. the `<NAME>_EXE` environment variable derived from the tool type name;
//! 3. the options-level provider ([`ToolOptions::custom_tool_path`]);
//! 4. the tool-level provider on the descriptor;
//! 5. the descriptor's own [`PathStrategy`].
//!
//! There are no retries. If every step comes up empty the invocation fails with
//! [`ToolError::ToolNotFound`].

use crate::constants::{PROCESS_TOOL_PATH, TOOL_PATH_ENV_SUFFIX};
use crate::core::config::ResolverConfig;
use crate::core::options::{Options, OptionsError};
use crate::core::tool_options::ToolOptions;
use crate::models::{PathStrategy, ToolDescriptor};
use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Which resolution step produced a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolPathSource {
    /// `ProcessToolPath`.
    Override,
    /// The `<NAME>_EXE` variable.
    Environment,
    /// `ToolOptions::custom_tool_path`.
    OptionsProvider,
    /// The descriptor's tool path provider.
    ToolProvider,
    /// The descriptor's path strategy.
    Descriptor,
}

impl fmt::Display for ToolPathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToolPathSource::Override => "explicit override",
            ToolPathSource::Environment => "environment variable",
            ToolPathSource::OptionsProvider => "options provider",
            ToolPathSource::ToolProvider => "tool provider",
            ToolPathSource::Descriptor => "tool descriptor",
        };
        f.write_str(name)
    }
}

/// An executable together with the step that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToolPath {
    /// The executable.
    pub path: PathBuf,
    /// The step that produced `path`.
    pub source: ToolPathSource,
}

/// Failures while resolving an executable.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Every step came up empty.
    #[error("Tool '{tool}' could not be found (tried: {tried}).")]
    ToolNotFound {
        /// Tool type name.
        tool: &'static str,
        /// Steps that were attempted.
        tried: String,
    },
    /// The options type has no command binding.
    #[error("Options type '{0}' is not bound to any tool.")]
    MissingMetadata(&'static str),
    /// The packages directory could not be expanded.
    #[error("Packages directory could not be determined: {0}")]
    Config(String),
    /// A process metadata value could not be decoded.
    #[error(transparent)]
    Options(#[from] OptionsError),
}

/// Name of the environment variable overriding `tool`'s executable,
/// e.g. `CargoTasks` -> `CARGO_EXE`.
pub fn env_var_name(tool: &ToolDescriptor) -> String {
    format!("{}{}", tool.short_name().to_uppercase(), TOOL_PATH_ENV_SUFFIX)
}

/// Runs the resolution steps against a [`ResolverConfig`].
#[derive(Debug, Clone, Default)]
pub struct ToolPathResolver {
    config: ResolverConfig,
}

impl ToolPathResolver {
    /// A resolver over an explicit configuration.
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Builds a resolver from the default config file and environment.
    pub fn from_env() -> Self {
        let config = ResolverConfig::load_default().unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable resolver config: {:#}", e);
            ResolverConfig::default()
        });
        Self::new(config)
    }

    /// The configuration in use.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Finds the executable for `options`, trying each step in order.
    pub fn resolve<T: ToolOptions>(&self, options: &T) -> Result<ResolvedToolPath, ToolError> {
        let schema = T::schema();
        let tool = schema
            .binding
            .ok_or(ToolError::MissingMetadata(schema.type_name))?
            .tool;

        let found = |path: PathBuf,
                     source: ToolPathSource|
         -> Result<ResolvedToolPath, ToolError> {
            log::debug!(
                "Resolved '{}' via {}: {}",
                tool.type_name,
                source,
                path.display()
            );
            Ok(ResolvedToolPath { path, source })
        };
        let mut tried = vec![PROCESS_TOOL_PATH.to_string()];

        // 1. Explicit override, returned verbatim.
        log::trace!("Resolving '{}': checking explicit override", tool.type_name);
        if let Some(path) = options.process_tool_path()? {
            return found(path, ToolPathSource::Override);
        }

        // 2. `<NAME>_EXE`. Blank values count as unset.
        let variable = env_var_name(tool);
        log::trace!("Resolving '{}': checking ${}", tool.type_name, variable);
        if let Ok(value) = std::env::var(&variable)
            && !value.trim().is_empty()
        {
            return found(PathBuf::from(value), ToolPathSource::Environment);
        }
        tried.push(format!("${}", variable));

        // 3. Options-level provider.
        log::trace!("Resolving '{}': asking options provider", tool.type_name);
        if let Some(path) = options.custom_tool_path() {
            return found(path, ToolPathSource::OptionsProvider);
        }
        tried.push(ToolPathSource::OptionsProvider.to_string());

        // 4. Tool-level provider.
        if let Some(provider) = tool.tool_path_provider {
            log::trace!("Resolving '{}': asking tool provider", tool.type_name);
            if let Some(path) = provider(options.options()) {
                return found(path, ToolPathSource::ToolProvider);
            }
            tried.push(ToolPathSource::ToolProvider.to_string());
        }

        // 5. The descriptor's own strategy.
        log::trace!("Resolving '{}': using descriptor strategy", tool.type_name);
        if let Some(path) = self.resolve_from_descriptor(tool, options.options())? {
            return found(
                dunce::simplified(&path).to_path_buf(),
                ToolPathSource::Descriptor,
            );
        }
        tried.push(format!(
            "{:?} lookup of {}",
            tool.strategy,
            tool.executables.join("/")
        ));

        Err(ToolError::ToolNotFound {
            tool: tool.type_name,
            tried: tried.join(", "),
        })
    }

    fn resolve_from_descriptor(
        &self,
        tool: &ToolDescriptor,
        options: &Options,
    ) -> Result<Option<PathBuf>, ToolError> {
        match tool.strategy {
            PathStrategy::SearchPath => {
                if !self.config.search_path {
                    return Ok(None);
                }
                Ok(tool
                    .executables
                    .iter()
                    .find_map(|name| which::which(name).ok()))
            }
            PathStrategy::Package => {
                let Some(package_id) = tool.package_id else {
                    return Ok(None);
                };
                let Some(root) = self
                    .config
                    .packages_dir()
                    .map_err(|e| ToolError::Config(format!("{:#}", e)))?
                else {
                    log::debug!("No packages directory configured for '{}'", tool.type_name);
                    return Ok(None);
                };
                let framework = match tool.framework_property {
                    Some(key) => options.get_opt::<String>(key)?,
                    None => None,
                };
                Ok(find_in_package(
                    &root,
                    package_id,
                    tool.executables,
                    framework.as_deref(),
                ))
            }
            PathStrategy::Unresolvable => Ok(None),
        }
    }
}

/// Orders version directory names by their numeric core (`1.10.0` after `1.2.0`).
/// A prerelease (`2.0.0-preview`) ranks below the release with the same core.
fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse = |v: &str| -> (Vec<u64>, bool) {
        let (core, tag) = v.split_at(v.find(['-', '+']).unwrap_or(v.len()));
        let numbers = core
            .split('.')
            .map(|part| {
                let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
                digits.parse().unwrap_or(0)
            })
            .collect();
        (numbers, tag.starts_with('-'))
    };
    let (a_core, a_pre) = parse(a);
    let (b_core, b_pre) = parse(b);
    a_core
        .cmp(&b_core)
        .then_with(|| b_pre.cmp(&a_pre))
        .then_with(|| a.cmp(b))
}

fn executable_matches(file_name: &str, executables: &[&str]) -> bool {
    executables.iter().any(|exe| {
        file_name == *exe || (cfg!(windows) && file_name == format!("{}.exe", exe))
    })
}

/// Looks for `<root>/<package>/<version>/**/<exe>`, newest version first. With a
/// framework, only paths containing a `<framework>` component match.
fn find_in_package(
    root: &Path,
    package_id: &str,
    executables: &[&str],
    framework: Option<&str>,
) -> Option<PathBuf> {
    let package_dir = [package_id.to_string(), package_id.to_lowercase()]
        .into_iter()
        .map(|name| root.join(name))
        .find(|dir| dir.is_dir())?;

    let mut versions: Vec<PathBuf> = fs::read_dir(&package_dir)
        .map_err(|e| log::debug!("Cannot read '{}': {}", package_dir.display(), e))
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    versions.sort_by(|a, b| {
        let name = |p: &Path| p.file_name().map(|n| n.to_string_lossy().into_owned());
        compare_versions(&name(b).unwrap_or_default(), &name(a).unwrap_or_default())
    });

    for version_dir in versions {
        let hit = WalkDir::new(&version_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| executable_matches(&entry.file_name().to_string_lossy(), executables))
            .find(|entry| match framework {
                Some(framework) => entry
                    .path()
                    .strip_prefix(&version_dir)
                    .map(|relative| relative.components().any(|c| c.as_os_str() == framework))
                    .unwrap_or(false),
                None => true,
            });
        if let Some(entry) = hit {
            return Some(entry.into_path());
        }
    }
    None
}
