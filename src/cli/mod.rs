//! Command-line interface
//!
//! Argument definitions, command handlers and terminal rendering.

pub mod args;
pub mod commands;
pub mod render;
