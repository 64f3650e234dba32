//! Generation settings persisted as JSON in the app data directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::generation::GenerationOptions;

/// Default on-disk location for the settings file.
pub fn default_settings_path() -> Result<PathBuf, String> {
    let data_dir = dirs::data_dir().ok_or("Could not determine data directory")?;
    Ok(data_dir.join("simulaface").join("settings.json"))
}

/// Load settings, falling back to defaults when the file does not exist.
pub fn load_settings(path: &Path) -> Result<GenerationOptions, String> {
    if !path.exists() {
        return Ok(GenerationOptions::default());
    }
    let json =
        fs::read_to_string(path).map_err(|e| format!("Failed to read settings file: {}", e))?;
    serde_json::from_str(&json).map_err(|e| format!("Failed to parse settings file: {}", e))
}

/// Write settings through a temp file and a rename so a crash mid-write
/// never leaves a truncated file behind.
pub fn save_settings(options: &GenerationOptions, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create settings directory: {}", e))?;
    }
    let json = serde_json::to_string_pretty(options)
        .map_err(|e| format!("Failed to serialize settings: {}", e))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| format!("Failed to write settings file: {}", e))?;
    fs::rename(&tmp, path).map_err(|e| format!("Failed to replace settings file: {}", e))?;

    info!("Saved settings to {}", path.display());
    Ok(())
}
