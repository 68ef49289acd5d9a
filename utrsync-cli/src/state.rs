use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn utrsync_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".utrsync"))
}

/// `save_config` creates the directory on first write.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(utrsync_home()?.join("config.toml"))
}
