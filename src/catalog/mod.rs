//! Facial adjustment catalog: the fixed reference data behind the
//! adjustment UI.
//!
//! The catalog is pure data loaded from `config/facial_areas.toml` at
//! compile time. Areas and options are never user-editable; the only
//! user-owned state is the per-option [`AdjustmentValue`] mapping held in
//! [`AdjustmentsState`].

mod areas;
mod types;

pub use areas::{facial_areas, find_area, find_option, is_known_adjustment};
pub use types::*;
