// src/core/mod.rs

//! The options engine: storage, rendering and tool resolution.

/// Ready-made escape hooks.
pub mod commons;
/// Resolver configuration.
pub mod config;
/// Key to many values container.
pub mod multimap;
/// The property bag and its mutation API.
pub mod options;
/// Options to argument tokens.
pub mod renderer;
/// Options to executable path.
pub mod resolver;
/// Ordered JSON storage.
pub mod store;
/// Format template parsing.
pub mod template;
/// The trait implemented by concrete option types.
pub mod tool_options;

#[cfg(test)]
pub(crate) mod test_support;
