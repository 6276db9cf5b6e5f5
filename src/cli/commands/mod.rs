//! CLI command implementations
//!
//! Each command is implemented in its own module.

pub mod emit;
pub mod notify;
pub mod sli;
