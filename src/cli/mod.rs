//! CLI layer
//!
//! Diagnostic commands for checking a deployment's collaborators by hand.

pub mod commands;
pub mod output;

pub use output::Output;
