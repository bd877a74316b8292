//! Model-info command handler.

use std::path::Path;

use anyhow::{Context, Result};

use laptime_lib::load_model;

use crate::output::{render_model_info, OutputFormat};

/// Handle the model-info subcommand.
///
/// Loads the artifact exactly as the service would, so a successful run
/// also confirms the artifact is servable.
pub fn handle_model_info(path: &Path, format: OutputFormat) -> Result<()> {
    let loaded = load_model(path)
        .with_context(|| format!("failed to load model from {}", path.display()))?;
    println!("{}", render_model_info(&loaded.info, format)?);
    Ok(())
}
