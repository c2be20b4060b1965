//! `pmirror render`: run the text pipeline over a local file.
//!
//! Nothing is downloaded, so asset links are left as they are. Handy for
//! checking a config change against a single document.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::models::ItemId;
use crate::transform::render_document;

/// Render `path` as item `item` and print the result on stdout.
pub fn run_render(config: &Config, path: &Path, item: &str) -> Result<()> {
    print!("{}", render_file(config, path, item)?);
    Ok(())
}

pub fn render_file(config: &Config, path: &Path, item: &str) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(render_document(&text, &ItemId::new(item), config))
}
