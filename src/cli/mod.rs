//! Command-line interface definitions and helpers.

mod args;
mod commands;

pub use args::{usage, Args};
pub use commands::init_config;
