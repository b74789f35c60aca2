// src/constants.rs

//! Store keys and naming conventions shared across the crate.

/// Store key for the explicit executable path override.
pub const PROCESS_TOOL_PATH: &str = "ProcessToolPath";

/// Store key for the working directory handed to the process launcher.
pub const PROCESS_WORKING_DIRECTORY: &str = "ProcessWorkingDirectory";

/// Store key for the extra environment variables of the invocation.
pub const PROCESS_ENVIRONMENT_VARIABLES: &str = "ProcessEnvironmentVariables";

/// Store key for the execution timeout, in milliseconds.
pub const PROCESS_EXECUTION_TIMEOUT: &str = "ProcessExecutionTimeout";

/// Store key toggling output logging of the launched process.
pub const PROCESS_OUTPUT_LOGGING: &str = "ProcessOutputLogging";

/// Store key toggling logging of the invocation itself.
pub const PROCESS_INVOCATION_LOGGING: &str = "ProcessInvocationLogging";

/// Every process metadata key. None of them is ever rendered as an argument.
pub const PROCESS_KEYS: &[&str] = &[
    PROCESS_TOOL_PATH,
    PROCESS_WORKING_DIRECTORY,
    PROCESS_ENVIRONMENT_VARIABLES,
    PROCESS_EXECUTION_TIMEOUT,
    PROCESS_OUTPUT_LOGGING,
    PROCESS_INVOCATION_LOGGING,
];

/// Conventional suffix of tool type names, stripped when deriving the env override name.
pub const TOOL_TYPE_SUFFIX: &str = "Tasks";

/// Suffix appended to the upper-cased tool name to form the env override name.
pub const TOOL_PATH_ENV_SUFFIX: &str = "_EXE";

/// Placeholder replaced by a rendered value inside a format template.
pub const VALUE_PLACEHOLDER: &str = "{value}";

/// Placeholder replaced by an entry key inside a map format template.
pub const KEY_PLACEHOLDER: &str = "{key}";

/// The name of the resolver configuration file (in ~/.config/toolopts/).
pub const RESOLVER_CONFIG_FILENAME: &str = "toolopts.toml";

/// Environment variable overriding the packages directory of the resolver config.
pub const PACKAGES_DIR_ENV: &str = "TOOLOPTS_PACKAGES_DIR";
