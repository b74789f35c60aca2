// src/cli/handlers/resolve.rs

//! `toolopts resolve`: prints the executable an options file would run.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use crate::{
    cli::handlers::commons,
    core::{config::ResolverConfig, resolver::ToolPathResolver},
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Prints the executable an options file would run."
)]
struct ResolveArgs {
    /// The options command to resolve for (see `toolopts list`).
    command: String,

    /// JSON file holding the options. `-` reads standard input.
    #[arg(long, short)]
    options: Option<PathBuf>,

    /// Resolver configuration file. Defaults to `~/.config/toolopts/toolopts.toml`.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Also print which resolution step produced the path.
    #[arg(long, short)]
    verbose: bool,
}

/// Handles `toolopts resolve <command>`.
pub fn handle(args: Vec<String>) -> Result<()> {
    let resolve_args = ResolveArgs::try_parse_from(&args)?;
    let command = commons::find_options_command(&resolve_args.command)?;
    let portable = commons::read_options(resolve_args.options.as_deref())?;

    let config = match &resolve_args.config {
        Some(path) => ResolverConfig::load(path)?,
        None => ResolverConfig::load_default()?,
    };
    let resolver = ToolPathResolver::new(config);

    let resolved = (command.resolve)(&portable, &resolver)?;
    if resolve_args.verbose {
        println!(
            "{} {}",
            resolved.path.display(),
            format!("({})", resolved.source).dimmed()
        );
    } else {
        println!("{}", resolved.path.display());
    }
    Ok(())
}
