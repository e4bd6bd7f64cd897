//! Command line interface

pub mod commands;
pub mod display;
pub mod dup;

pub use commands::CliArgs;
