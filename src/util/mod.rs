//! Utility functions and helpers

pub mod type_name;

pub use type_name::{short_type_name, type_name_of};
