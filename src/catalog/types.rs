//! Type definitions for the adjustment catalog and user selections.
//!
//! Catalog types deserialize from TOML (reference data); selection types
//! round-trip through JSON for session persistence and history snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One named region of the face with its adjustment options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacialArea {
    /// Stable identifier (e.g. "nose", "chin")
    pub id: String,
    /// Display label for the UI
    pub label: String,
    /// Options offered for this area, in display order
    pub options: Vec<AdjustmentOption>,
}

/// One specific modification within an area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentOption {
    /// Identifier, unique only within its area
    pub id: String,
    /// Display label for the UI
    pub label: String,
    /// Descriptive key naming the modification in prompt terms
    pub prompt_key: String,
}

/// Subject-gender hint. Only steers identity-preservation phrasing in the
/// directive; never gates which adjustments are available.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unspecified,
}

/// A user's selection for one (area, option) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentValue {
    pub area_id: String,
    pub option_id: String,
    /// Intensity in 0..=100
    pub intensity: u8,
    pub enabled: bool,
}

impl AdjustmentValue {
    pub fn new(area_id: &str, option_id: &str, intensity: u8, enabled: bool) -> Self {
        Self {
            area_id: area_id.to_string(),
            option_id: option_id.to_string(),
            intensity,
            enabled,
        }
    }

    /// The key this value lives under in [`AdjustmentsState`].
    pub fn composite_key(&self) -> String {
        composite_key(&self.area_id, &self.option_id)
    }

    /// Active means the entry contributes to the directive.
    pub fn is_active(&self) -> bool {
        self.enabled && self.intensity > 0
    }
}

/// Build the composite key `{area_id}_{option_id}` for an adjustment.
pub fn composite_key(area_id: &str, option_id: &str) -> String {
    format!("{}_{}", area_id, option_id)
}

/// The session's adjustment mapping, keyed by composite key.
///
/// An absent key is equivalent to a disabled adjustment. Iteration order is
/// lexicographic by key, so anything derived from it (directive phrase
/// order in particular) is stable across runs and independent of the order
/// the user touched the sliders.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct AdjustmentsState(BTreeMap<String, AdjustmentValue>);

impl AdjustmentsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert one adjustment under the given composite key.
    pub fn insert(&mut self, key: &str, value: AdjustmentValue) {
        self.0.insert(key.to_string(), value);
    }

    /// Upsert one adjustment under its own composite key.
    pub fn set(&mut self, value: AdjustmentValue) {
        self.0.insert(value.composite_key(), value);
    }

    pub fn get(&self, key: &str) -> Option<&AdjustmentValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<AdjustmentValue> {
        self.0.remove(key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AdjustmentValue)> {
        self.0.iter()
    }

    /// The active set: enabled entries with positive intensity, in key order.
    pub fn active(&self) -> impl Iterator<Item = (&String, &AdjustmentValue)> {
        self.0.iter().filter(|(_, v)| v.is_active())
    }
}
