//! The session controller: owns all mutable session state and enforces the
//! workflow state machine.
//!
//! Generation itself is asynchronous and external; the controller stays
//! synchronous. `begin_generation` flips the processing latch and hands the
//! caller everything the external call needs; exactly one of
//! `complete_generation` / `fail_generation` ends the processing state.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::{AdjustmentValue, AdjustmentsState, Gender};
use crate::prompt::build_directive;

use super::types::{CapturedPhoto, PhotoSource, SessionError, SessionStep};

/// Everything the external generation call needs, captured at the moment
/// the processing latch was taken.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationInput {
    pub photo_data_url: String,
    pub directive: String,
}

/// Ephemeral single-photo, single-result session state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSession {
    photo: Option<CapturedPhoto>,
    adjustments: AdjustmentsState,
    gender: Gender,
    result_image: Option<String>,
    last_error: Option<String>,
    last_directive: Option<String>,
    processing: bool,
}

impl SimulationSession {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Accessors ---

    pub fn photo(&self) -> Option<&CapturedPhoto> {
        self.photo.as_ref()
    }

    pub fn adjustments(&self) -> &AdjustmentsState {
        &self.adjustments
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn result_image(&self) -> Option<&str> {
        self.result_image.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The directive built for the most recent generation attempt.
    pub fn last_directive(&self) -> Option<&str> {
        self.last_directive.as_deref()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Derive the workflow step from the current state.
    pub fn step(&self) -> SessionStep {
        if self.processing {
            SessionStep::Processing
        } else if self.result_image.is_some() {
            SessionStep::Completed
        } else if self.last_error.is_some() {
            SessionStep::Failed
        } else if self.photo.is_none() {
            SessionStep::Empty
        } else if self.adjustments.is_empty() {
            SessionStep::PhotoSet
        } else {
            SessionStep::AdjustmentsChosen
        }
    }

    // --- Input mutation ---

    /// Set the session photo, replacing any previous one (single-photo
    /// policy: only the most recently set photo is kept).
    pub fn set_photo(&mut self, photo: CapturedPhoto) {
        self.photo = Some(photo);
    }

    pub fn clear_photo(&mut self) {
        self.photo = None;
    }

    /// Upsert one adjustment by composite key.
    pub fn set_adjustment(&mut self, key: &str, value: AdjustmentValue) {
        self.adjustments.insert(key, value);
    }

    pub fn clear_adjustments(&mut self) {
        self.adjustments.clear();
    }

    /// Typically set once before capture; never gates available adjustments.
    pub fn set_gender(&mut self, gender: Gender) {
        self.gender = gender;
    }

    // --- Generation lifecycle ---

    /// Take the processing latch and build the generation input.
    ///
    /// Preconditions: a photo must be present and no generation may be in
    /// flight. Rejection leaves the session untouched. On success the
    /// previous result and error are cleared and the directive is retained
    /// for immediate retry.
    pub fn begin_generation(&mut self) -> Result<GenerationInput, SessionError> {
        if self.processing {
            return Err(SessionError::AlreadyProcessing);
        }
        let photo = self.photo.as_ref().ok_or(SessionError::NoPhoto)?;

        let directive = build_directive(&self.adjustments, self.gender);
        info!("Beginning generation ({} chars directive)", directive.len());

        let input = GenerationInput {
            photo_data_url: photo.data_url.clone(),
            directive: directive.clone(),
        };
        self.processing = true;
        self.result_image = None;
        self.last_error = None;
        self.last_directive = Some(directive);
        Ok(input)
    }

    /// Immediate retry after a failure: re-enter processing with the
    /// last-built directive instead of re-synthesizing it.
    pub fn retry_generation(&mut self) -> Result<GenerationInput, SessionError> {
        if self.processing {
            return Err(SessionError::AlreadyProcessing);
        }
        if self.last_error.is_none() {
            return Err(SessionError::NothingToRetry);
        }
        let photo = self.photo.as_ref().ok_or(SessionError::NoPhoto)?;
        let directive = self
            .last_directive
            .clone()
            .ok_or(SessionError::NothingToRetry)?;

        info!("Retrying generation with previous directive");
        let input = GenerationInput {
            photo_data_url: photo.data_url.clone(),
            directive,
        };
        self.processing = true;
        self.last_error = None;
        Ok(input)
    }

    /// Terminal success transition: store the result and release the latch.
    pub fn complete_generation(&mut self, result_image: &str) {
        if !self.processing {
            warn!("complete_generation called outside of a processing state");
        }
        self.result_image = Some(result_image.to_string());
        self.last_error = None;
        self.processing = false;
    }

    /// Terminal failure transition: release the latch, surface the reason,
    /// and leave photo and adjustments intact so retry needs no re-entry.
    pub fn fail_generation(&mut self, reason: &str) {
        if !self.processing {
            warn!("fail_generation called outside of a processing state");
        }
        warn!("Generation failed: {}", reason);
        self.last_error = Some(reason.to_string());
        self.processing = false;
    }

    // --- Result-driven flows ---

    /// "Redo with original": keep the photo, drop adjustments, result, and
    /// error. Valid from any settled (non-processing) state.
    pub fn accept_redo_with_original(&mut self) -> Result<(), SessionError> {
        if self.processing {
            return Err(SessionError::AlreadyProcessing);
        }
        self.adjustments.clear();
        self.result_image = None;
        self.last_error = None;
        self.last_directive = None;
        Ok(())
    }

    /// "Continue editing": the generated result becomes the new input
    /// photo and adjustments start over. Valid only with a result in hand.
    pub fn accept_continue_editing(&mut self) -> Result<(), SessionError> {
        if self.processing {
            return Err(SessionError::AlreadyProcessing);
        }
        let result = self.result_image.take().ok_or(SessionError::NoResult)?;
        self.photo = Some(CapturedPhoto::new(&result, PhotoSource::GeneratedResult));
        self.adjustments.clear();
        self.last_error = None;
        self.last_directive = None;
        Ok(())
    }

    /// Return to the fully empty initial state ("start new simulation").
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo() -> CapturedPhoto {
        CapturedPhoto::new("data:image/jpeg;base64,QUJD", PhotoSource::Camera)
    }

    fn session_with_photo() -> SimulationSession {
        let mut session = SimulationSession::new();
        session.set_photo(photo());
        session
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = SimulationSession::new();
        assert_eq!(session.step(), SessionStep::Empty);
        assert!(session.photo().is_none());
        assert!(!session.is_processing());
    }

    #[test]
    fn test_step_progression() {
        let mut session = SimulationSession::new();
        assert_eq!(session.step(), SessionStep::Empty);

        session.set_photo(photo());
        assert_eq!(session.step(), SessionStep::PhotoSet);

        session.set_adjustment(
            "nose_slim",
            AdjustmentValue::new("nose", "slim", 80, true),
        );
        assert_eq!(session.step(), SessionStep::AdjustmentsChosen);

        session.begin_generation().unwrap();
        assert_eq!(session.step(), SessionStep::Processing);

        session.complete_generation("https://example.com/result.png");
        assert_eq!(session.step(), SessionStep::Completed);
    }

    #[test]
    fn test_begin_generation_without_photo_is_rejected() {
        let mut session = SimulationSession::new();
        assert_eq!(session.begin_generation(), Err(SessionError::NoPhoto));
        assert!(!session.is_processing());
        assert_eq!(session.step(), SessionStep::Empty);
    }

    #[test]
    fn test_begin_generation_while_processing_is_rejected() {
        let mut session = session_with_photo();
        session.begin_generation().unwrap();
        assert!(session.is_processing());

        assert_eq!(
            session.begin_generation(),
            Err(SessionError::AlreadyProcessing)
        );
        // The latch is not disturbed by the rejected call
        assert!(session.is_processing());
    }

    #[test]
    fn test_begin_generation_clears_previous_result_and_error() {
        let mut session = session_with_photo();
        session.begin_generation().unwrap();
        session.fail_generation("backend unavailable");
        assert_eq!(session.step(), SessionStep::Failed);
        assert_eq!(session.last_error(), Some("backend unavailable"));

        session.begin_generation().unwrap();
        assert!(session.last_error().is_none());
        assert!(session.result_image().is_none());
    }

    #[test]
    fn test_set_photo_replaces_existing() {
        let mut session = session_with_photo();
        let first_id = session.photo().unwrap().id.clone();

        session.set_photo(CapturedPhoto::new(
            "data:image/jpeg;base64,REVG",
            PhotoSource::Upload,
        ));
        assert_ne!(session.photo().unwrap().id, first_id);
        assert_eq!(session.photo().unwrap().data_url, "data:image/jpeg;base64,REVG");
    }

    #[test]
    fn test_generation_input_contains_directive() {
        let mut session = session_with_photo();
        session.set_gender(Gender::Male);
        session.set_adjustment(
            "nose_slim",
            AdjustmentValue::new("nose", "slim", 80, true),
        );

        let input = session.begin_generation().unwrap();
        assert_eq!(input.photo_data_url, "data:image/jpeg;base64,QUJD");
        assert!(input
            .directive
            .contains("significantly slimmer nose with refined bridge"));
        assert!(input.directive.contains("facial hair"));
        assert_eq!(session.last_directive(), Some(input.directive.as_str()));
    }

    #[test]
    fn test_fail_generation_preserves_input_for_retry() {
        let mut session = session_with_photo();
        session.set_adjustment(
            "chin_define",
            AdjustmentValue::new("chin", "define", 40, true),
        );
        session.begin_generation().unwrap();
        session.fail_generation("timeout after 60s");

        assert_eq!(session.step(), SessionStep::Failed);
        assert!(session.photo().is_some());
        assert_eq!(session.adjustments().len(), 1);
        assert_eq!(session.last_error(), Some("timeout after 60s"));
    }

    #[test]
    fn test_retry_reuses_last_directive() {
        let mut session = session_with_photo();
        session.set_adjustment(
            "nose_slim",
            AdjustmentValue::new("nose", "slim", 80, true),
        );
        let first = session.begin_generation().unwrap();
        session.fail_generation("backend error");

        // Mutating adjustments after failure must not affect the retry input
        session.set_adjustment(
            "lips_volume",
            AdjustmentValue::new("lips", "volume", 90, true),
        );

        let retry = session.retry_generation().unwrap();
        assert_eq!(retry.directive, first.directive);
        assert!(session.is_processing());
    }

    #[test]
    fn test_retry_without_failure_is_rejected() {
        let mut session = session_with_photo();
        assert_eq!(
            session.retry_generation(),
            Err(SessionError::NothingToRetry)
        );
    }

    #[test]
    fn test_redo_with_original_keeps_photo() {
        let mut session = session_with_photo();
        let photo_id = session.photo().unwrap().id.clone();
        session.set_adjustment(
            "nose_slim",
            AdjustmentValue::new("nose", "slim", 80, true),
        );
        session.begin_generation().unwrap();
        session.complete_generation("https://example.com/result.png");

        session.accept_redo_with_original().unwrap();
        assert_eq!(session.photo().unwrap().id, photo_id);
        assert!(session.adjustments().is_empty());
        assert!(session.result_image().is_none());
        assert_eq!(session.step(), SessionStep::PhotoSet);
    }

    #[test]
    fn test_redo_with_original_valid_from_failed() {
        let mut session = session_with_photo();
        session.begin_generation().unwrap();
        session.fail_generation("backend error");

        session.accept_redo_with_original().unwrap();
        assert!(session.last_error().is_none());
        assert_eq!(session.step(), SessionStep::PhotoSet);
    }

    #[test]
    fn test_continue_editing_promotes_result_to_photo() {
        let mut session = session_with_photo();
        session.set_adjustment(
            "nose_slim",
            AdjustmentValue::new("nose", "slim", 80, true),
        );
        session.begin_generation().unwrap();
        session.complete_generation("https://example.com/result.png");

        session.accept_continue_editing().unwrap();
        let photo = session.photo().unwrap();
        assert_eq!(photo.data_url, "https://example.com/result.png");
        assert_eq!(photo.source, PhotoSource::GeneratedResult);
        assert!(session.adjustments().is_empty());
        assert!(session.result_image().is_none());
        assert_eq!(session.step(), SessionStep::PhotoSet);
    }

    #[test]
    fn test_continue_editing_requires_completed_state() {
        let mut session = session_with_photo();
        assert_eq!(
            session.accept_continue_editing(),
            Err(SessionError::NoResult)
        );

        session.begin_generation().unwrap();
        assert_eq!(
            session.accept_continue_editing(),
            Err(SessionError::AlreadyProcessing)
        );

        session.fail_generation("backend error");
        assert_eq!(
            session.accept_continue_editing(),
            Err(SessionError::NoResult)
        );
    }

    #[test]
    fn test_reset_returns_to_empty() {
        let mut session = session_with_photo();
        session.set_gender(Gender::Female);
        session.set_adjustment(
            "nose_slim",
            AdjustmentValue::new("nose", "slim", 80, true),
        );
        session.begin_generation().unwrap();
        session.complete_generation("https://example.com/result.png");

        session.reset();
        assert_eq!(session.step(), SessionStep::Empty);
        assert!(session.photo().is_none());
        assert!(session.adjustments().is_empty());
        assert_eq!(session.gender(), Gender::Unspecified);
        assert!(session.result_image().is_none());
    }

    #[test]
    fn test_serde_round_trip_preserves_state() {
        let mut session = session_with_photo();
        session.set_gender(Gender::Female);
        session.set_adjustment(
            "lips_volume",
            AdjustmentValue::new("lips", "volume", 65, true),
        );

        let json = serde_json::to_string(&session).unwrap();
        let back: SimulationSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back.step(), SessionStep::AdjustmentsChosen);
        assert_eq!(back.gender(), Gender::Female);
        assert_eq!(back.adjustments().len(), 1);
        assert_eq!(back.photo().unwrap().id, session.photo().unwrap().id);
    }
}
