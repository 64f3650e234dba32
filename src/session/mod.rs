//! Simulation session: the client-held workflow state from photo capture
//! through result review.
//!
//! One session holds exactly one photo, one adjustment mapping, one gender
//! hint, and at most one in-flight generation. The controller owns every
//! transition; callers drive the external generation call with the input
//! [`GenerationInput`] it hands out and report back through
//! `complete_generation` / `fail_generation`.

mod controller;
mod persist;
mod types;

pub use controller::{GenerationInput, SimulationSession};
pub use persist::{default_session_path, load_session, save_session};
pub use types::{CapturedPhoto, PhotoSource, SessionError, SessionStep};
