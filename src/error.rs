use thiserror::Error;

use crate::session::SessionError;

/// Top-level error taxonomy for the simulation core.
///
/// Every variant is recoverable from the caller's perspective: quota and
/// auth failures block until resolved out of band, generation and
/// persistence failures carry a retry affordance.
#[derive(Debug, Error)]
pub enum SimulafaceError {
    #[error("Not authenticated")]
    Unauthorized,

    #[error("No simulations remaining. Upgrade your plan to continue.")]
    QuotaExhausted,

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("History error: {0}")]
    Persistence(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl SimulafaceError {
    /// Whether retrying the same operation without changing anything else
    /// can succeed. Quota and auth failures need out-of-band action first.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SimulafaceError::Generation(_) | SimulafaceError::Persistence(_)
        )
    }
}

impl From<SimulafaceError> for String {
    fn from(err: SimulafaceError) -> Self {
        err.to_string()
    }
}
