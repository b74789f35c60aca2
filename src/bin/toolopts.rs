// src/bin/toolopts.rs

//! The `toolopts` command-line entry point.

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser};
use colored::*;
use toolopts::cli::{Cli, handlers};

// --- Command Definition and Registry ---

/// A top-level action, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>) -> Result<()>,
}

static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "render",
        aliases: &["args"],
        handler: handlers::render::handle,
    },
    CommandDefinition {
        name: "resolve",
        aliases: &["which"],
        handler: handlers::resolve::handle,
    },
    CommandDefinition {
        name: "schema",
        aliases: &["describe"],
        handler: handlers::schema::handle,
    },
];

fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // Handler argument errors (including `--help`) print and exit the clap way.
        if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
            clap_err.exit();
        }

        eprintln!("\n{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let Some(action) = cli.action else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match find_command(&action) {
        Some(command) => (command.handler)(cli.args),
        None => Err(anyhow!(
            "Unknown action '{}'. Expected one of: {}.",
            action,
            COMMAND_REGISTRY
                .iter()
                .map(|cmd| cmd.name)
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}
