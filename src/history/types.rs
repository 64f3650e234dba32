use serde::{Deserialize, Serialize};

use crate::catalog::AdjustmentsState;

/// Per-user account row: plan tier and remaining simulation credits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub display_name: Option<String>,
    pub clinic: Option<String>,
    pub plan: String,
    pub simulations_remaining: i64,
    pub created_at: String,
}

/// Lightweight row for history listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub id: i64,
    pub created_at: String,
    pub has_result: bool,
}

/// Full record of one saved simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationDetail {
    pub id: i64,
    pub user_id: String,
    pub original_photo: String,
    pub result_image: Option<String>,
    pub adjustments: AdjustmentsState,
    pub prompt: String,
    pub created_at: String,
}
