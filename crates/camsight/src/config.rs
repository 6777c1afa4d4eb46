//! JSON configuration loading.
//!
//! Processor configs derive `serde` with `#[serde(default)]`, so a config
//! file only needs the fields it overrides.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::Result;

/// Parse a config from a JSON string.
pub fn from_json_str<T: DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a JSON config file.
pub fn from_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = std::fs::read_to_string(path)?;
    from_json_str(&data)
}
