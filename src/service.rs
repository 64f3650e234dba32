//! Orchestration of a full simulation run: authentication, quota,
//! session transitions, and the generation call.
//!
//! Quota is checked up front but only spent in `save_result`, so a failed
//! or discarded generation never costs a credit.

use tracing::{error, info};

use crate::error::SimulafaceError;
use crate::generation::{prepare_photo, GenerationClient, GenerationOptions};
use crate::history::SimulationHistory;
use crate::session::SimulationSession;

/// Source of the current user identity. The hosted product resolves this
/// from an auth token; tests and the CLI use fixed values.
pub trait Identity {
    fn current_user(&self) -> Option<String>;
}

/// What a successful run leaves behind, alongside the updated session.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub result_image: String,
    pub directive: String,
}

/// Run one simulation for the current user.
///
/// Order of checks: identity, profile and quota, then the session's own
/// preconditions via `begin_generation`. Any generation failure is routed
/// through `fail_generation` so the session lands in a retryable state.
pub async fn run_simulation(
    identity: &dyn Identity,
    history: &SimulationHistory,
    client: &GenerationClient,
    session: &mut SimulationSession,
    options: &GenerationOptions,
) -> Result<SimulationOutcome, SimulafaceError> {
    let user_id = identity
        .current_user()
        .ok_or(SimulafaceError::Unauthorized)?;

    let profile = history
        .ensure_profile(&user_id)
        .map_err(SimulafaceError::Persistence)?;
    if profile.simulations_remaining <= 0 {
        info!("User {} has no simulation credits left", user_id);
        return Err(SimulafaceError::QuotaExhausted);
    }

    let input = session.begin_generation()?;

    let result = run_generation(client, &input.photo_data_url, &input.directive, options).await;
    match result {
        Ok(result_image) => {
            session.complete_generation(&result_image);
            info!("Simulation completed for user {}", user_id);
            Ok(SimulationOutcome {
                result_image,
                directive: input.directive,
            })
        }
        Err(reason) => {
            error!("Simulation failed for user {}: {}", user_id, reason);
            session.fail_generation(&reason);
            Err(SimulafaceError::Generation(reason))
        }
    }
}

/// The generation pipeline proper: validate and downscale the photo,
/// host it, run the model.
async fn run_generation(
    client: &GenerationClient,
    photo_data_url: &str,
    directive: &str,
    options: &GenerationOptions,
) -> Result<String, String> {
    let prepared = prepare_photo(photo_data_url)?;
    let image_url = client.resolve_image_url(&prepared).await?;
    let result = client.generate(&image_url, directive, options).await?;
    result
        .first_image()
        .map(|url| url.to_string())
        .ok_or_else(|| "Generation returned no images".to_string())
}

/// Persist a completed simulation and spend one quota credit.
/// Returns the saved row ID.
pub fn save_result(
    identity: &dyn Identity,
    history: &SimulationHistory,
    session: &SimulationSession,
) -> Result<i64, SimulafaceError> {
    let user_id = identity
        .current_user()
        .ok_or(SimulafaceError::Unauthorized)?;

    let photo = session
        .photo()
        .ok_or(crate::session::SessionError::NoPhoto)?;
    let result_image = session
        .result_image()
        .ok_or(crate::session::SessionError::NoResult)?;
    let prompt = session.last_directive().unwrap_or_default();

    let id = history
        .record_simulation(
            &user_id,
            &photo.data_url,
            Some(result_image),
            session.adjustments(),
            prompt,
        )
        .map_err(SimulafaceError::Persistence)?;

    match history
        .consume_simulation(&user_id)
        .map_err(SimulafaceError::Persistence)?
    {
        Some(remaining) => {
            info!(
                "Saved simulation {} for user {} ({} credits left)",
                id, user_id, remaining
            );
            Ok(id)
        }
        None => {
            // The quota must have been drained between the run and the save
            history
                .delete_simulation(id)
                .map_err(SimulafaceError::Persistence)?;
            Err(SimulafaceError::QuotaExhausted)
        }
    }
}
