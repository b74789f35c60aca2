// src/tools/mod.rs

//! Built-in option types for concrete tools.

/// `cargo build` and `cargo test`.
pub mod cargo;
