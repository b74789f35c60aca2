// src/cli/handlers/list.rs

//! `toolopts list`.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{cli::handlers::commons::OPTIONS_REGISTRY, core::resolver::env_var_name};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists the available options commands.")]
struct ListArgs {}

/// Handles `toolopts list`.
pub fn handle(args: Vec<String>) -> Result<()> {
    let _list_args = ListArgs::try_parse_from(&args)?;

    println!("\n--- {} ---", "Options commands".yellow());
    for command in OPTIONS_REGISTRY {
        let schema = (command.schema)();
        let aliases = if command.aliases.is_empty() {
            String::new()
        } else {
            format!(" ({})", command.aliases.join(", "))
        };
        println!("  {}{}", command.name.cyan().bold(), aliases.dimmed());
        println!("    {:<12} {}", "type".blue(), schema.type_name);
        if let Some(binding) = schema.binding {
            println!("    {:<12} {}", "tool".blue(), binding.tool.type_name);
            println!("    {:<12} {}", "override".blue(), env_var_name(binding.tool));
        }
        println!(
            "    {:<12} {}",
            "properties".blue(),
            schema.properties.len()
        );
    }
    Ok(())
}
