// src/cli/mod.rs

//! Command-line surface of the `toolopts` binary.

use clap::Parser;

/// Per-action handlers.
pub mod handlers;

/// toolopts: renders typed tool options into command lines.
///
/// Options files are the portable JSON form of an options type: a flat
/// object mapping property keys to values.
///
/// Commands:
/// - `toolopts render <command> [--options FILE] [--shell]`
/// - `toolopts resolve <command> [--options FILE] [--config FILE]`
/// - `toolopts schema <command>`
/// - `toolopts list`
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
#[command(
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
pub struct Cli {
    /// The action to run (`render`, `resolve`, `schema` or `list`).
    pub action: Option<String>,

    /// Arguments passed to the action.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
