//! API key storage in the OS keychain.

use keyring::Entry;
use tracing::{info, warn};

const SERVICE: &str = "simulaface-fal-api";
const ACCOUNT: &str = "simulaface";

fn entry() -> Result<Entry, String> {
    Entry::new(SERVICE, ACCOUNT).map_err(|e| {
        warn!("Failed to create keyring entry: {}", e);
        e.to_string()
    })
}

pub fn set_api_key(key: &str) -> Result<(), String> {
    info!("Storing fal.ai API key in keychain");
    entry()?.set_password(key).map_err(|e| {
        warn!("Failed to set API key: {}", e);
        e.to_string()
    })
}

/// Fetch the stored API key. A missing entry is not an error.
pub fn get_api_key() -> Result<Option<String>, String> {
    match entry()?.get_password() {
        Ok(password) => Ok(Some(password)),
        Err(keyring::Error::NoEntry) => {
            info!("No fal.ai API key stored");
            Ok(None)
        }
        Err(e) => {
            warn!("Failed to read API key: {}", e);
            Err(e.to_string())
        }
    }
}

pub fn delete_api_key() -> Result<(), String> {
    info!("Deleting fal.ai API key from keychain");
    entry()?.delete_credential().map_err(|e| {
        warn!("Failed to delete API key: {}", e);
        e.to_string()
    })
}
