pub mod conf;
pub mod endpoints;
pub mod fetch;
pub mod health;
pub mod info;
pub mod status;

use crate::conf::{KortekConfig, load_config};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Loads `path`, or the built-in defaults when nothing exists there.
pub fn load_or_default(path: &Path) -> Result<KortekConfig> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "no configuration found; using defaults");
        return Ok(KortekConfig::default());
    }

    load_config(path).with_context(|| format!("loading {}", path.display()))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}
