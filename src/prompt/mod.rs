//! Directive synthesis for the image-generation backend.
//!
//! The backend is steered entirely by natural language, so the directive's
//! structure is the actual lever against over-transformation: the identity
//! lock brackets the change list on both sides, and the change list itself
//! is built from a fixed phrase table rather than free-form text.
//!
//! # Example
//!
//! ```ignore
//! use simulaface::catalog::{AdjustmentValue, AdjustmentsState, Gender};
//! use simulaface::prompt::build_directive;
//!
//! let mut adjustments = AdjustmentsState::new();
//! adjustments.set(AdjustmentValue::new("nose", "slim", 80, true));
//!
//! let directive = build_directive(&adjustments, Gender::Male);
//! assert!(directive.contains("significantly slimmer nose with refined bridge"));
//! ```

mod builder;
mod phrases;

pub use builder::{build_directive, BASELINE_DIRECTIVE};
pub use phrases::{default_phrases, PhraseSet, PhraseTable, Tier, LOW_TIER_MAX, MEDIUM_TIER_MAX};
