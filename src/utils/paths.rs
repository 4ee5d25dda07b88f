use std::path::PathBuf;

use crate::error::{Error, Result};

/// Get the main application directory (~/.modelvault)
pub fn get_app_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| Error::Snapshot("Failed to determine home directory".to_string()))?;

    let path = PathBuf::from(home).join(".modelvault");
    std::fs::create_dir_all(&path)?;

    Ok(path)
}

/// Get the registry snapshot file path (~/.modelvault/profiles.json)
pub fn get_snapshot_path() -> Result<PathBuf> {
    Ok(get_app_dir()?.join("profiles.json"))
}
