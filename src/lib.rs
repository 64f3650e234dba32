//! Simulation core for aesthetic consultation tools: a photo-in,
//! photo-out workflow where a practitioner marks facial adjustments on
//! sliders and an image model renders the projected outcome while keeping
//! the patient recognizable.
//!
//! The crate is split along the workflow:
//! - [`catalog`]: the fixed menu of facial areas and adjustment options
//! - [`prompt`]: deterministic synthesis of the generation directive
//! - [`session`]: the single-photo session state machine
//! - [`generation`]: the fal.ai client and photo preparation
//! - [`history`]: saved simulations and per-user quota in SQLite
//! - [`service`]: end-to-end orchestration of one simulation run

pub mod catalog;
pub mod credentials;
pub mod error;
pub mod generation;
pub mod history;
pub mod prompt;
pub mod service;
pub mod session;
pub mod settings;

pub use catalog::{AdjustmentValue, AdjustmentsState, Gender};
pub use error::SimulafaceError;
pub use generation::{GenerationClient, GenerationOptions};
pub use history::SimulationHistory;
pub use prompt::{build_directive, BASELINE_DIRECTIVE};
pub use service::{run_simulation, save_result, Identity, SimulationOutcome};
pub use session::{CapturedPhoto, PhotoSource, SessionStep, SimulationSession};

/// Install the global tracing subscriber. Call once at startup; the
/// `RUST_LOG` env filter overrides the default `info` level.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
