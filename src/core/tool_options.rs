// src/core/tool_options.rs

//! # Tool Options
//!
//! The trait implemented by every concrete options type. It ties an [`Options`]
//! bag to its registration table and adds the process metadata consumed by the
//! launcher. All builder methods go through [`ToolOptions::modify`]: they clone
//! the receiver, change the clone and return it. The receiver never changes.

use crate::constants::{
    PROCESS_ENVIRONMENT_VARIABLES, PROCESS_EXECUTION_TIMEOUT, PROCESS_INVOCATION_LOGGING,
    PROCESS_OUTPUT_LOGGING, PROCESS_TOOL_PATH, PROCESS_WORKING_DIRECTORY,
};
use crate::core::options::{Options, OptionsError};
use crate::core::renderer::{self, RenderError};
use crate::core::resolver::{ResolvedToolPath, ToolError, ToolPathResolver};
use crate::models::OptionsSchema;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A typed options value bound to a tool through its registration table.
pub trait ToolOptions: Clone + fmt::Debug + Sized {
    /// The underlying property bag.
    fn options(&self) -> &Options;

    /// Mutable access, used inside [`ToolOptions::modify`].
    fn options_mut(&mut self) -> &mut Options;

    /// The registration table of this type. Built once, read on every render.
    fn schema() -> &'static OptionsSchema;

    /// Options-level executable lookup. Consulted after the explicit override and
    /// the environment variable, before the tool-level provider.
    fn custom_tool_path(&self) -> Option<PathBuf> {
        None
    }

    /// Returns a changed copy of `self`. The receiver is left untouched.
    fn modify<F>(&self, mutator: F) -> Result<Self, OptionsError>
    where
        F: FnOnce(&mut Self) -> Result<(), OptionsError>,
    {
        let mut clone = self.clone();
        mutator(&mut clone)?;
        Ok(clone)
    }

    /// Returns a copy with `key` set to `value` (`None` removes the key).
    fn with<V: Serialize>(&self, key: &str, value: V) -> Result<Self, OptionsError> {
        self.modify(|o| o.options_mut().set(key, value))
    }

    /// Returns a copy without `key`.
    fn without(&self, key: &str) -> Result<Self, OptionsError> {
        self.modify(|o| {
            o.options_mut().remove(key);
            Ok(())
        })
    }

    /// Renders the argument tokens, executable excluded.
    fn render_arguments(&self) -> Result<Vec<String>, RenderError> {
        renderer::render_arguments(self)
    }

    /// Resolves the executable with the default resolver configuration.
    fn resolve_tool_path(&self) -> Result<ResolvedToolPath, ToolError> {
        ToolPathResolver::from_env().resolve(self)
    }

    // --- Process metadata ---

    /// Explicit executable override.
    fn process_tool_path(&self) -> Result<Option<PathBuf>, OptionsError> {
        self.options().get_opt(PROCESS_TOOL_PATH)
    }

    /// Returns a copy with the executable override set.
    fn with_process_tool_path(&self, path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        self.with(PROCESS_TOOL_PATH, path.as_ref())
    }

    /// Working directory of the invocation.
    fn process_working_directory(&self) -> Result<Option<PathBuf>, OptionsError> {
        self.options().get_opt(PROCESS_WORKING_DIRECTORY)
    }

    /// Returns a copy with the working directory set.
    fn with_process_working_directory(&self, dir: impl AsRef<Path>) -> Result<Self, OptionsError> {
        self.with(PROCESS_WORKING_DIRECTORY, dir.as_ref())
    }

    /// Extra environment variables of the invocation.
    fn process_environment_variables(&self) -> Result<BTreeMap<String, String>, OptionsError> {
        self.options().get(PROCESS_ENVIRONMENT_VARIABLES)
    }

    /// Returns a copy with `name` set to `value` in the environment.
    fn with_process_environment_variable(
        &self,
        name: &str,
        value: &str,
    ) -> Result<Self, OptionsError> {
        self.modify(|o| {
            o.options_mut()
                .set_entry(PROCESS_ENVIRONMENT_VARIABLES, name, value)
        })
    }

    /// Returns a copy without the environment variable `name`.
    fn without_process_environment_variable(&self, name: &str) -> Result<Self, OptionsError> {
        self.modify(|o| {
            o.options_mut()
                .remove_entry(PROCESS_ENVIRONMENT_VARIABLES, name)
        })
    }

    /// Execution timeout, stored in milliseconds.
    fn process_execution_timeout(&self) -> Result<Option<Duration>, OptionsError> {
        Ok(self
            .options()
            .get_opt::<u64>(PROCESS_EXECUTION_TIMEOUT)?
            .map(Duration::from_millis))
    }

    /// Returns a copy with the timeout set. Saturates at `u64::MAX` ms.
    fn with_process_execution_timeout(&self, timeout: Duration) -> Result<Self, OptionsError> {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.with(PROCESS_EXECUTION_TIMEOUT, millis)
    }

    /// Whether the launcher logs the tool's output.
    fn process_output_logging(&self) -> Result<Option<bool>, OptionsError> {
        self.options().get_opt(PROCESS_OUTPUT_LOGGING)
    }

    /// Returns a copy with output logging toggled.
    fn with_process_output_logging(&self, enabled: bool) -> Result<Self, OptionsError> {
        self.with(PROCESS_OUTPUT_LOGGING, enabled)
    }

    /// Whether the launcher logs the invocation.
    fn process_invocation_logging(&self) -> Result<Option<bool>, OptionsError> {
        self.options().get_opt(PROCESS_INVOCATION_LOGGING)
    }

    /// Returns a copy with invocation logging toggled.
    fn with_process_invocation_logging(&self, enabled: bool) -> Result<Self, OptionsError> {
        self.with(PROCESS_INVOCATION_LOGGING, enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{EchoSettings, MIDDLE};

    #[test]
    fn test_modify_leaves_receiver_untouched() {
        let original = EchoSettings::default().with(MIDDLE, "one").unwrap();
        let changed = original.with(MIDDLE, "two").unwrap();

        assert_eq!(original.options().get::<String>(MIDDLE).unwrap(), "one");
        assert_eq!(changed.options().get::<String>(MIDDLE).unwrap(), "two");
    }

    #[test]
    fn test_noop_modify_is_equal_but_isolated() {
        let original = EchoSettings::default()
            .modify(|o| o.options_mut().add_items("Items", ["a"]))
            .unwrap();
        let mut copy = original.modify(|_| Ok(())).unwrap();
        assert_eq!(copy, original);

        copy.options_mut().add_items("Items", ["b"]).unwrap();
        assert_eq!(
            original.options().get::<Vec<String>>("Items").unwrap(),
            vec!["a"]
        );
        assert_ne!(copy, original);
    }

    #[test]
    fn test_failed_modify_returns_error() {
        let original = EchoSettings::default().with("Items", "scalar").unwrap();
        let result = original.modify(|o| o.options_mut().add_items("Items", ["x"]));
        assert!(matches!(result, Err(OptionsError::ShapeMismatch { .. })));
        assert_eq!(original.options().get::<String>("Items").unwrap(), "scalar");
    }

    #[test]
    fn test_process_metadata_accessors() {
        let settings = EchoSettings::default()
            .with_process_tool_path("/opt/echo")
            .unwrap()
            .with_process_working_directory("/tmp")
            .unwrap()
            .with_process_environment_variable("RUST_LOG", "debug")
            .unwrap()
            .with_process_environment_variable("NO_COLOR", "1")
            .unwrap()
            .with_process_execution_timeout(Duration::from_secs(3))
            .unwrap()
            .with_process_output_logging(false)
            .unwrap()
            .with_process_invocation_logging(true)
            .unwrap();

        assert_eq!(
            settings.process_tool_path().unwrap(),
            Some(PathBuf::from("/opt/echo"))
        );
        assert_eq!(
            settings.process_working_directory().unwrap(),
            Some(PathBuf::from("/tmp"))
        );
        let env = settings.process_environment_variables().unwrap();
        assert_eq!(env.get("RUST_LOG").map(String::as_str), Some("debug"));
        assert_eq!(env.len(), 2);
        assert_eq!(
            settings.process_execution_timeout().unwrap(),
            Some(Duration::from_millis(3000))
        );
        assert_eq!(settings.process_output_logging().unwrap(), Some(false));
        assert_eq!(settings.process_invocation_logging().unwrap(), Some(true));

        let trimmed = settings
            .without_process_environment_variable("NO_COLOR")
            .unwrap();
        assert_eq!(trimmed.process_environment_variables().unwrap().len(), 1);
        assert_eq!(settings.process_environment_variables().unwrap().len(), 2);
    }

    #[test]
    fn test_process_metadata_defaults() {
        let settings = EchoSettings::default();
        assert_eq!(settings.process_tool_path().unwrap(), None);
        assert_eq!(settings.process_execution_timeout().unwrap(), None);
        assert!(settings.process_environment_variables().unwrap().is_empty());
        assert_eq!(settings.process_output_logging().unwrap(), None);
    }
}
