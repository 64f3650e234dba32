//! Embedded facial-area catalog loading.
//!
//! The catalog ships inside the binary; there is no runtime configuration
//! path because the area/option set is part of the product, not a user
//! preference.

use std::sync::OnceLock;

use serde::Deserialize;

use super::types::{AdjustmentOption, FacialArea};

/// Catalog embedded in the binary at compile time.
const CATALOG_TOML: &str = include_str!("../../config/facial_areas.toml");

#[derive(Debug, Deserialize)]
struct CatalogConfig {
    areas: Vec<FacialArea>,
}

/// All facial areas in display order.
///
/// # Panics
/// Panics if the embedded TOML is invalid (a compile-time bug).
pub fn facial_areas() -> &'static [FacialArea] {
    static CATALOG: OnceLock<Vec<FacialArea>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        let config: CatalogConfig =
            toml::from_str(CATALOG_TOML).expect("embedded facial_areas.toml must be valid TOML");
        config.areas
    })
}

/// Look up an area by its stable identifier.
pub fn find_area(area_id: &str) -> Option<&'static FacialArea> {
    facial_areas().iter().find(|a| a.id == area_id)
}

/// Look up an option within an area.
pub fn find_option(area_id: &str, option_id: &str) -> Option<&'static AdjustmentOption> {
    find_area(area_id)?.options.iter().find(|o| o.id == option_id)
}

/// Whether an (area, option) pair exists in the catalog.
pub fn is_known_adjustment(area_id: &str, option_id: &str) -> bool {
    find_option(area_id, option_id).is_some()
}
