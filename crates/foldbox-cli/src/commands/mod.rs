//! CLI command implementations.

pub mod common;
pub mod config;
pub mod curves;
pub mod devices;
pub mod patches;
pub mod play;
pub mod render;
