//! Freight CLI - exposes the freight core over JSON files and stdin.
//!
//! Every subcommand reads one JSON document and prints one JSON document,
//! except `report`, which prints (or writes) the rendered payload.

pub mod commands;
pub mod config;
pub mod input;

pub use config::{Config, LogFormat};
