//! Session persistence: JSON snapshot of the session in the app data
//! directory so a draft survives restarts.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::controller::SimulationSession;

/// Default on-disk location for the session snapshot.
pub fn default_session_path() -> Result<PathBuf, String> {
    let data_dir = dirs::data_dir().ok_or("Could not determine data directory")?;
    Ok(data_dir.join("simulaface").join("session.json"))
}

/// Write the session as JSON. The write goes through a temp file in the
/// same directory and a rename, so a crash mid-write never leaves a
/// truncated snapshot behind.
pub fn save_session(session: &SimulationSession, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create session directory: {}", e))?;
    }

    let json = serde_json::to_string_pretty(session)
        .map_err(|e| format!("Failed to serialize session: {}", e))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| format!("Failed to write session file: {}", e))?;
    fs::rename(&tmp, path).map_err(|e| format!("Failed to replace session file: {}", e))?;

    info!("Saved session snapshot to {}", path.display());
    Ok(())
}

/// Load a previously saved session. A missing file is not an error; it
/// simply means there is no draft to restore.
pub fn load_session(path: &Path) -> Result<Option<SimulationSession>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let json =
        fs::read_to_string(path).map_err(|e| format!("Failed to read session file: {}", e))?;
    let session: SimulationSession =
        serde_json::from_str(&json).map_err(|e| format!("Failed to parse session file: {}", e))?;
    Ok(Some(session))
}
