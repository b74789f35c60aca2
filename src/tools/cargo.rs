// src/tools/cargo.rs

//! Options for `cargo build` and `cargo test`.

use crate::core::options::{Options, OptionsError};
use crate::core::tool_options::ToolOptions;
use crate::models::{
    ArgumentRule, CommandBinding, OptionsSchema, PropertyDef, ToolDescriptor, ValueKind,
};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The `cargo` executable, found on `PATH`.
pub static CARGO: ToolDescriptor = ToolDescriptor::new("CargoTasks").executables(&["cargo"]);

/// `--manifest-path`.
pub const MANIFEST_PATH: &str = "ManifestPath";
/// `--package`, once per entry.
pub const PACKAGES: &str = "Packages";
/// `--features`, comma-joined.
pub const FEATURES: &str = "Features";
/// `--all-features`.
pub const ALL_FEATURES: &str = "AllFeatures";
/// `--release`.
pub const RELEASE: &str = "Release";
/// `--profile`.
pub const PROFILE: &str = "Profile";
/// `--target`.
pub const TARGET: &str = "Target";
/// `--target-dir`.
pub const TARGET_DIR: &str = "TargetDir";
/// `--jobs`.
pub const JOBS: &str = "Jobs";
/// `--config=<key>=<value>`, once per entry.
pub const CONFIG: &str = "Config";
/// `--verbose`.
pub const VERBOSE: &str = "Verbose";
/// Test filter, first after the command.
pub const TEST_NAME: &str = "TestName";
/// `--no-fail-fast`.
pub const NO_FAIL_FAST: &str = "NoFailFast";
/// Arguments for the test binaries, after `--`.
pub const TEST_ARGS: &str = "TestArgs";

// Properties shared by every cargo command.
const COMMON: &[PropertyDef] = &[
    PropertyDef::scalar(MANIFEST_PATH, ValueKind::Path)
        .argument(ArgumentRule::new("--manifest-path {value}")),
    PropertyDef::sequence(PACKAGES, ValueKind::String)
        .argument(ArgumentRule::new("--package={value}")),
    PropertyDef::sequence(FEATURES, ValueKind::String)
        .argument(ArgumentRule::new("--features {value}").list_separator(",")),
    PropertyDef::scalar(ALL_FEATURES, ValueKind::Bool)
        .argument(ArgumentRule::new("--all-features")),
    PropertyDef::scalar(RELEASE, ValueKind::Bool).argument(ArgumentRule::new("--release")),
    PropertyDef::scalar(PROFILE, ValueKind::String)
        .argument(ArgumentRule::new("--profile {value}")),
    PropertyDef::scalar(TARGET, ValueKind::String)
        .argument(ArgumentRule::new("--target {value}")),
    PropertyDef::scalar(TARGET_DIR, ValueKind::Path)
        .argument(ArgumentRule::new("--target-dir {value}")),
    PropertyDef::scalar(JOBS, ValueKind::Integer).argument(ArgumentRule::new("--jobs {value}")),
    PropertyDef::map(CONFIG, ValueKind::String)
        .argument(ArgumentRule::new("--config={key}={value}")),
    PropertyDef::scalar(VERBOSE, ValueKind::Bool).argument(ArgumentRule::new("--verbose")),
];

fn common_schema(type_name: &'static str, binding: CommandBinding) -> OptionsSchema {
    COMMON
        .iter()
        .fold(OptionsSchema::new(type_name).bind(binding), |schema, p| {
            schema.property(*p)
        })
}

lazy_static! {
    static ref BUILD_SCHEMA: OptionsSchema = common_schema(
        "CargoBuildSettings",
        CommandBinding::new(&CARGO).implicit_arguments("build"),
    );
    static ref TEST_SCHEMA: OptionsSchema = common_schema(
        "CargoTestSettings",
        CommandBinding::new(&CARGO).implicit_arguments("test"),
    )
    .property(
        PropertyDef::scalar(TEST_NAME, ValueKind::String)
            .argument(ArgumentRule::new("{value}").position(1))
    )
    .property(
        PropertyDef::scalar(NO_FAIL_FAST, ValueKind::Bool)
            .argument(ArgumentRule::new("--no-fail-fast"))
    )
    .property(
        PropertyDef::sequence(TEST_ARGS, ValueKind::String)
            .argument(ArgumentRule::new("-- {value}").position(-1))
    );
}

/// Builder methods shared by the cargo option types.
pub trait CargoSettings: ToolOptions {
    /// Sets the manifest to build.
    fn with_manifest_path(&self, path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        self.with(MANIFEST_PATH, path.as_ref())
    }

    /// Appends packages to select.
    fn add_packages<I, S>(&self, packages: I) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let packages: Vec<String> = packages.into_iter().map(Into::into).collect();
        self.modify(|o| o.options_mut().add_items(PACKAGES, packages))
    }

    /// Appends features to enable.
    fn add_features<I, S>(&self, features: I) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let features: Vec<String> = features.into_iter().map(Into::into).collect();
        self.modify(|o| o.options_mut().add_items(FEATURES, features))
    }

    /// Removes features; unknown ones are ignored.
    fn remove_features<I, S>(&self, features: I) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let features: Vec<String> = features.into_iter().map(Into::into).collect();
        self.modify(|o| o.options_mut().remove_items(FEATURES, features))
    }

    /// Clears the feature list.
    fn clear_features(&self) -> Result<Self, OptionsError> {
        self.modify(|o| o.options_mut().clear_items(FEATURES))
    }

    /// Toggles `--all-features`.
    fn with_all_features(&self, enabled: bool) -> Result<Self, OptionsError> {
        self.with(ALL_FEATURES, enabled)
    }

    /// Toggles `--release`.
    fn with_release(&self, enabled: bool) -> Result<Self, OptionsError> {
        self.with(RELEASE, enabled)
    }

    /// Sets the build profile.
    fn with_profile(&self, profile: &str) -> Result<Self, OptionsError> {
        self.with(PROFILE, profile)
    }

    /// Sets the target triple.
    fn with_target(&self, triple: &str) -> Result<Self, OptionsError> {
        self.with(TARGET, triple)
    }

    /// Sets the output directory.
    fn with_target_dir(&self, dir: impl AsRef<Path>) -> Result<Self, OptionsError> {
        self.with(TARGET_DIR, dir.as_ref())
    }

    /// Sets the number of parallel jobs.
    fn with_jobs(&self, jobs: u32) -> Result<Self, OptionsError> {
        self.with(JOBS, jobs)
    }

    /// Sets one `--config` entry.
    fn set_config(&self, key: &str, value: &str) -> Result<Self, OptionsError> {
        self.modify(|o| o.options_mut().set_entry(CONFIG, key, value))
    }

    /// Removes one `--config` entry.
    fn remove_config(&self, key: &str) -> Result<Self, OptionsError> {
        self.modify(|o| o.options_mut().remove_entry(CONFIG, key))
    }

    /// Toggles `--verbose`.
    fn with_verbose(&self, enabled: bool) -> Result<Self, OptionsError> {
        self.with(VERBOSE, enabled)
    }
}

/// Options of `cargo build`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CargoBuildSettings(Options);

impl ToolOptions for CargoBuildSettings {
    fn options(&self) -> &Options {
        &self.0
    }

    fn options_mut(&mut self) -> &mut Options {
        &mut self.0
    }

    fn schema() -> &'static OptionsSchema {
        &BUILD_SCHEMA
    }
}

impl CargoSettings for CargoBuildSettings {}

/// Options of `cargo test`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CargoTestSettings(Options);

impl ToolOptions for CargoTestSettings {
    fn options(&self) -> &Options {
        &self.0
    }

    fn options_mut(&mut self) -> &mut Options {
        &mut self.0
    }

    fn schema() -> &'static OptionsSchema {
        &TEST_SCHEMA
    }
}

impl CargoSettings for CargoTestSettings {}

impl CargoTestSettings {
    /// Only runs tests whose name contains `filter`.
    pub fn with_test_name(&self, filter: &str) -> Result<Self, OptionsError> {
        self.with(TEST_NAME, filter)
    }

    /// Toggles `--no-fail-fast`.
    pub fn with_no_fail_fast(&self, enabled: bool) -> Result<Self, OptionsError> {
        self.with(NO_FAIL_FAST, enabled)
    }

    /// Arguments handed to the test binaries, after `--`.
    pub fn add_test_args<I, S>(&self, args: I) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        self.modify(|o| o.options_mut().add_items(TEST_ARGS, args))
    }
}
