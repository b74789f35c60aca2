// src/cli/handlers/schema.rs

//! `toolopts schema`.

use anyhow::Result;
use clap::Parser;

use crate::cli::handlers::commons;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Prints the declared properties of an options command as JSON."
)]
struct SchemaArgs {
    /// The options command to describe (see `toolopts list`).
    command: String,
}

/// Handles `toolopts schema <command>`.
pub fn handle(args: Vec<String>) -> Result<()> {
    let schema_args = SchemaArgs::try_parse_from(&args)?;
    let command = commons::find_options_command(&schema_args.command)?;

    let description = (command.schema)().describe();
    println!("{}", serde_json::to_string_pretty(&description)?);
    Ok(())
}
