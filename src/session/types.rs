//! Type definitions for the simulation session.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a session photo came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PhotoSource {
    /// Captured live from the device camera
    Camera,
    /// Uploaded from a file
    Upload,
    /// A previous generation result promoted to input ("continue editing")
    GeneratedResult,
}

/// A single photo held by the session, as a data URL or remote reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CapturedPhoto {
    pub id: String,
    pub data_url: String,
    pub source: PhotoSource,
    pub captured_at: DateTime<Utc>,
}

impl CapturedPhoto {
    pub fn new(data_url: &str, source: PhotoSource) -> Self {
        let suffix: u16 = rand::rng().random_range(0..10_000);
        Self {
            id: format!("photo-{}-{:04}", Utc::now().timestamp_millis(), suffix),
            data_url: data_url.to_string(),
            source,
            captured_at: Utc::now(),
        }
    }
}

/// Derived session-level state, in workflow order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionStep {
    /// No photo yet
    Empty,
    /// Photo present, no adjustments chosen
    PhotoSet,
    /// Photo present with at least one adjustment entry
    AdjustmentsChosen,
    /// Generation call in flight
    Processing,
    /// Result available
    Completed,
    /// Last generation attempt failed; input preserved for retry
    Failed,
}

/// Precondition failures on session operations. These reject the operation
/// without mutating any session state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No photo captured")]
    NoPhoto,

    #[error("A generation is already in progress")]
    AlreadyProcessing,

    #[error("No generation result available")]
    NoResult,

    #[error("No failed generation to retry")]
    NothingToRetry,
}

impl From<SessionError> for String {
    fn from(err: SessionError) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captured_photo_ids_are_unique() {
        let a = CapturedPhoto::new("data:image/png;base64,AAAA", PhotoSource::Camera);
        let b = CapturedPhoto::new("data:image/png;base64,AAAA", PhotoSource::Camera);
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("photo-"));
    }

    #[test]
    fn test_photo_serde_round_trip() {
        let photo = CapturedPhoto::new("data:image/jpeg;base64,QUJD", PhotoSource::Upload);
        let json = serde_json::to_string(&photo).unwrap();
        assert!(json.contains("\"dataUrl\""));
        assert!(json.contains("\"upload\""));

        let back: CapturedPhoto = serde_json::from_str(&json).unwrap();
        assert_eq!(back, photo);
    }

    #[test]
    fn test_session_error_to_string() {
        let msg: String = SessionError::AlreadyProcessing.into();
        assert!(msg.contains("already in progress"));
    }
}
