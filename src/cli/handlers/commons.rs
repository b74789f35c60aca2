// src/cli/handlers/commons.rs

//! Shared pieces of the handlers: the options command registry and file loading.

use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use std::fs;
use std::io;
use std::path::Path;

use crate::{
    core::{
        resolver::{ResolvedToolPath, ToolPathResolver},
        tool_options::ToolOptions,
    },
    models::OptionsSchema,
    tools::cargo::{CargoBuildSettings, CargoTestSettings},
};

/// An options type reachable from the command line.
#[derive(Debug)]
pub struct OptionsCommand {
    /// Primary name on the command line.
    pub name: &'static str,
    /// Alternative names.
    pub aliases: &'static [&'static str],
    /// Registration table of the options type.
    pub schema: fn() -> &'static OptionsSchema,
    /// Decodes portable options text and renders it.
    pub render: fn(&str) -> Result<Vec<String>>,
    /// Decodes portable options text and resolves its executable.
    pub resolve: fn(&str, &ToolPathResolver) -> Result<ResolvedToolPath>,
}

/// Every options type the binary knows about.
pub static OPTIONS_REGISTRY: &[OptionsCommand] = &[
    OptionsCommand {
        name: "cargo-build",
        aliases: &["build"],
        schema: schema_of::<CargoBuildSettings>,
        render: render_as::<CargoBuildSettings>,
        resolve: resolve_as::<CargoBuildSettings>,
    },
    OptionsCommand {
        name: "cargo-test",
        aliases: &["test"],
        schema: schema_of::<CargoTestSettings>,
        render: render_as::<CargoTestSettings>,
        resolve: resolve_as::<CargoTestSettings>,
    },
];

/// Finds an options command by its name or alias.
pub fn find_options_command(name: &str) -> Result<&'static OptionsCommand> {
    OPTIONS_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
        .ok_or_else(|| {
            anyhow!(
                "Unknown options command '{}'. Run 'toolopts list' to see the available ones.",
                name
            )
        })
}

/// Reads the portable options text from `path`; `-` reads standard input.
/// Without a path the options are empty.
pub fn read_options(path: Option<&Path>) -> Result<String> {
    match path {
        None => Ok(String::new()),
        Some(p) if p == Path::new("-") => {
            io::read_to_string(io::stdin()).context("Failed to read options from standard input")
        }
        Some(p) => fs::read_to_string(p)
            .with_context(|| format!("Failed to read options file '{}'", p.display())),
    }
}

fn decode<T: ToolOptions + DeserializeOwned + Default>(portable: &str) -> Result<T> {
    if portable.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(portable)
        .with_context(|| format!("Failed to decode options for '{}'", T::schema().type_name))
}

fn schema_of<T: ToolOptions>() -> &'static OptionsSchema {
    T::schema()
}

fn render_as<T: ToolOptions + DeserializeOwned + Default>(portable: &str) -> Result<Vec<String>> {
    Ok(decode::<T>(portable)?.render_arguments()?)
}

fn resolve_as<T: ToolOptions + DeserializeOwned + Default>(
    portable: &str,
    resolver: &ToolPathResolver,
) -> Result<ResolvedToolPath> {
    Ok(resolver.resolve(&decode::<T>(portable)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::ToolPathSource;
    use serial_test::serial;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_find_by_name_and_alias() {
        assert_eq!(find_options_command("cargo-build").unwrap().name, "cargo-build");
        assert_eq!(find_options_command("test").unwrap().name, "cargo-test");
        assert!(find_options_command("make").is_err());
    }

    #[test]
    fn test_render_from_portable_text() {
        let command = find_options_command("cargo-build").unwrap();
        let tokens = (command.render)(r#"{"Release":true,"Features":["a","b"]}"#).unwrap();
        assert_eq!(tokens, vec!["build", "--release", "--features", "a,b"]);
    }

    #[test]
    fn test_empty_text_means_default_options() {
        let command = find_options_command("cargo-test").unwrap();
        assert_eq!((command.render)("  \n").unwrap(), vec!["test"]);
    }

    #[test]
    fn test_malformed_text_is_an_error() {
        let command = find_options_command("cargo-build").unwrap();
        assert!((command.render)("[1, 2]").is_err());
        assert!((command.render)(r#"{"Features":"a"}"#).is_err());
    }

    #[test]
    #[serial]
    fn test_null_override_falls_through_to_environment() {
        // --- Setup ---
        let command = find_options_command("cargo-build").unwrap();
        let resolver = ToolPathResolver::default();

        // --- Execute ---
        let resolved = temp_env::with_var("CARGO_EXE", Some("/env/cargo"), || {
            (command.resolve)(r#"{"ProcessToolPath": null}"#, &resolver).unwrap()
        });

        // --- Assert ---
        assert_eq!(resolved.path, PathBuf::from("/env/cargo"));
        assert_eq!(resolved.source, ToolPathSource::Environment);
    }

    #[test]
    fn test_read_options_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"Jobs":4}"#).unwrap();
        file.flush().unwrap();

        assert_eq!(read_options(Some(file.path())).unwrap(), r#"{"Jobs":4}"#);
        assert_eq!(read_options(None).unwrap(), "");
        assert!(read_options(Some(Path::new("/definitely/not/here.json"))).is_err());
    }
}
