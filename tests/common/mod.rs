//! Shared helpers for the integration tests.

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_slack;
pub mod recorders;
