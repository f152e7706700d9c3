//! JSON and plain-file helpers for the ~/.skyflap/ data directory.

use crate::core::DATA_DIR_NAME;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Get the ~/.skyflap/ directory path, creating it if needed.
pub fn skyflap_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(DATA_DIR_NAME);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Full path for a file in ~/.skyflap/.
pub fn data_path(filename: &str) -> io::Result<PathBuf> {
    Ok(skyflap_dir()?.join(filename))
}

/// Load `dir/filename` as JSON. A missing file yields `T::default()`
/// quietly; a malformed one yields the default with a warning.
pub fn load_json_in<T: Default + serde::de::DeserializeOwned>(dir: &Path, filename: &str) -> T {
    let path = dir.join(filename);
    let json = match fs::read_to_string(&path) {
        Ok(json) => json,
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "no file, using defaults");
            return T::default();
        }
    };
    match serde_json::from_str(&json) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "malformed JSON, using defaults");
            T::default()
        }
    }
}

/// Load a JSON file from ~/.skyflap/, returning `T::default()` if missing or invalid.
pub fn load_json_or_default<T: Default + serde::de::DeserializeOwned>(filename: &str) -> T {
    match skyflap_dir() {
        Ok(dir) => load_json_in(&dir, filename),
        Err(err) => {
            tracing::warn!(%err, "data directory unavailable, using defaults");
            T::default()
        }
    }
}

/// Save a value as pretty-printed JSON to `dir/filename`.
pub fn save_json_in<T: serde::Serialize>(dir: &Path, filename: &str, data: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::create_dir_all(dir)?;
    fs::write(dir.join(filename), json)?;
    Ok(())
}

/// Save a value as pretty-printed JSON to ~/.skyflap/.
pub fn save_json<T: serde::Serialize>(filename: &str, data: &T) -> io::Result<()> {
    save_json_in(&skyflap_dir()?, filename, data)
}
