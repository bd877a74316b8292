//! Handlers for the CLI subcommands.
//!
//! main.rs parses arguments and dispatches here; each handler prints its
//! result to stdout and returns errors for main to report.

pub mod encode;
pub mod model_info;
pub mod predict;
