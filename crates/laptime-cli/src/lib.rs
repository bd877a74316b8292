//! Lap time CLI library.
//!
//! This crate provides the command handlers behind the `laptime-cli` binary:
//! lap argument parsing, local and remote prediction, and output rendering.

pub mod args;
pub mod commands;
pub mod output;
pub mod remote;
