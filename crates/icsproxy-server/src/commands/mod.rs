//! Subcommand implementations.

pub mod config;
pub mod parse;
pub mod serve;
