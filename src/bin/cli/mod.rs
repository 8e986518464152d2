//! CLI Module Organization
//!
//! - args: CLI argument structures
//! - commands: command execution against the library engine

pub mod args;
pub mod commands;

pub use args::*;
pub use commands::*;
