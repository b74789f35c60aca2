// src/cli/handlers/render.rs

//! `toolopts render`: prints the argument tokens of an options file.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::{cli::handlers::commons, core::commons::shell_quote};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Renders an options file into command-line arguments."
)]
struct RenderArgs {
    /// The options command to render for (see `toolopts list`).
    command: String,

    /// JSON file holding the options. `-` reads standard input.
    #[arg(long, short)]
    options: Option<PathBuf>,

    /// Print one shell-quoted command line, executable included.
    #[arg(long)]
    shell: bool,
}

/// Handles `toolopts render <command>`.
pub fn handle(args: Vec<String>) -> Result<()> {
    let render_args = RenderArgs::try_parse_from(&args)?;
    let command = commons::find_options_command(&render_args.command)?;
    let portable = commons::read_options(render_args.options.as_deref())?;

    let tokens = (command.render)(&portable)?;
    log::debug!("'{}' rendered {:?}", command.name, tokens);

    if render_args.shell {
        let program = (command.schema)()
            .binding
            .and_then(|binding| binding.tool.executables.first().copied());
        println!("{}", shell_line(program, &tokens));
    } else {
        for token in &tokens {
            println!("{}", token);
        }
    }
    Ok(())
}

fn shell_line(program: Option<&str>, tokens: &[String]) -> String {
    program
        .into_iter()
        .chain(tokens.iter().map(String::as_str))
        .map(shell_quote)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_line_quotes_tokens() {
        let tokens = vec!["build".to_string(), "--target-dir".to_string(), "my dir".to_string()];
        let line = shell_line(Some("cargo"), &tokens);
        assert!(line.starts_with("cargo build --target-dir "));
        assert_eq!(
            shlex::split(&line).unwrap(),
            vec!["cargo", "build", "--target-dir", "my dir"]
        );
    }

    #[test]
    fn test_args_parse() {
        let args = RenderArgs::try_parse_from(["cargo-build", "--options", "o.json", "--shell"])
            .unwrap();
        assert_eq!(args.command, "cargo-build");
        assert_eq!(args.options, Some(PathBuf::from("o.json")));
        assert!(args.shell);
    }

    #[test]
    fn test_help_surfaces_as_clap_error() {
        let err = handle(vec!["--help".to_string()]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<clap::Error>().map(|e| e.kind()),
            Some(clap::error::ErrorKind::DisplayHelp)
        );
    }
}
