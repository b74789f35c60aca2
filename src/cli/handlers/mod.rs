// src/cli/handlers/mod.rs

//! One module per action. Each handler parses its own arguments.

/// Registry and helpers shared by the handlers.
pub mod commons;
/// Lists options commands.
pub mod list;
/// Renders options into tokens.
pub mod render;
/// Resolves the executable.
pub mod resolve;
/// Describes an options command.
pub mod schema;
