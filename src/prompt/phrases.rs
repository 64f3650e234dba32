//! Tiered phrase table loading for directive synthesis.
//!
//! Phrases live in `config/adjustment_phrases.toml`, embedded at compile
//! time the same way the facial-area catalog is. Each composite adjustment
//! key maps to three phrase variants selected by intensity tier.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

/// Upper bound of the low intensity tier (inclusive).
pub const LOW_TIER_MAX: u8 = 35;

/// Upper bound of the medium intensity tier (inclusive).
pub const MEDIUM_TIER_MAX: u8 = 70;

/// Phrase table embedded in the binary at compile time.
const PHRASES_TOML: &str = include_str!("../../config/adjustment_phrases.toml");

/// Intensity tier selecting which phrase variant describes an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    /// Band an intensity (0..=100) into a tier. The 35/70 boundaries are
    /// fixed constants of the design.
    pub fn for_intensity(intensity: u8) -> Self {
        if intensity <= LOW_TIER_MAX {
            Tier::Low
        } else if intensity <= MEDIUM_TIER_MAX {
            Tier::Medium
        } else {
            Tier::High
        }
    }
}

/// The three phrase variants for one adjustment.
#[derive(Debug, Clone, Deserialize)]
pub struct PhraseSet {
    pub low: String,
    pub medium: String,
    pub high: String,
}

impl PhraseSet {
    pub fn for_tier(&self, tier: Tier) -> &str {
        match tier {
            Tier::Low => &self.low,
            Tier::Medium => &self.medium,
            Tier::High => &self.high,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PhraseConfig {
    phrases: HashMap<String, PhraseSet>,
}

/// Lookup table from composite adjustment key to its phrase variants.
#[derive(Debug)]
pub struct PhraseTable {
    phrases: HashMap<String, PhraseSet>,
}

impl PhraseTable {
    pub fn get(&self, composite_key: &str) -> Option<&PhraseSet> {
        self.phrases.get(composite_key)
    }

    pub fn contains_key(&self, composite_key: &str) -> bool {
        self.phrases.contains_key(composite_key)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

/// The default phrase table embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid (a compile-time bug).
pub fn default_phrases() -> &'static PhraseTable {
    static TABLE: OnceLock<PhraseTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let config: PhraseConfig = toml::from_str(PHRASES_TOML)
            .expect("embedded adjustment_phrases.toml must be valid TOML");
        PhraseTable {
            phrases: config.phrases,
        }
    })
}
