//! Simulation history and per-user quota accounting, stored in SQLite.

mod store;
mod types;

pub use store::{SimulationHistory, FREE_TIER_SIMULATIONS};
pub use types::{Profile, SimulationDetail, SimulationSummary};
