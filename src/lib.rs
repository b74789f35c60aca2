//! Typed tool options that render into ordered command-line arguments and
//! resolve the executable they are meant for.
//!
//! - [`core::store`] and [`core::options`]: the ordered property bag.
//! - [`core::tool_options`]: the trait concrete option types implement.
//! - [`core::renderer`]: options -> argv tokens.
//! - [`core::resolver`]: options -> executable path.
//! - [`models`]: the declarative metadata both of them read.

/// Command-line front end.
pub mod cli;
/// Shared constants.
pub mod constants;
/// Store, options, renderer and resolver.
pub mod core;
/// Declarative tool and property metadata.
pub mod models;
/// Built-in option types.
pub mod tools;

pub use crate::core::options::{Options, OptionsError};
pub use crate::core::renderer::RenderError;
pub use crate::core::resolver::{ResolvedToolPath, ToolError, ToolPathResolver, ToolPathSource};
pub use crate::core::tool_options::ToolOptions;
