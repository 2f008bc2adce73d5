use crate::conf::types::KortekConfig;
use crate::conf::validate::validate_config;
use crate::conf::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "kortek.hcl";

/// Loads and validates a config file. A directory is resolved to `<dir>/kortek.hcl`.
pub fn load_config(path: &Path) -> Result<KortekConfig, ConfigError> {
    let path = resolve(path);
    let contents = fs::read_to_string(&path).map_err(|e| ConfigError::read_file(&path, e))?;
    let cfg = parse_config(&path, &contents)?;
    validate_config(&cfg)?;
    Ok(cfg)
}

/// Parses without validating.
pub fn parse_config(path: &Path, contents: &str) -> Result<KortekConfig, ConfigError> {
    hcl::from_str(contents).map_err(|e| ConfigError::parse(path, e))
}

fn resolve(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(CONFIG_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}
