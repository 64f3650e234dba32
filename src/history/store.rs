use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use crate::catalog::AdjustmentsState;

use super::types::{Profile, SimulationDetail, SimulationSummary};

/// Simulation credits granted to a new free-tier profile.
pub const FREE_TIER_SIMULATIONS: i64 = 3;

/// SQLite store for profiles and saved simulations.
/// All operations are synchronous (rusqlite is blocking).
/// Callers in async contexts should use `tokio::task::spawn_blocking`.
pub struct SimulationHistory {
    conn: Connection,
}

impl SimulationHistory {
    /// Create or open the history database at the given file path.
    pub fn new(db_path: &Path) -> Result<Self, String> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create data dir: {}", e))?;
        }

        let conn = Connection::open(db_path)
            .map_err(|e| format!("Failed to open history db: {}", e))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS profiles (
                user_id TEXT PRIMARY KEY,
                display_name TEXT,
                clinic TEXT,
                plan TEXT NOT NULL DEFAULT 'free',
                simulations_remaining INTEGER NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )
        .map_err(|e| format!("Failed to create profiles table: {}", e))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS simulations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                original_photo TEXT NOT NULL,
                result_image TEXT,
                adjustments_json TEXT NOT NULL,
                prompt TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )
        .map_err(|e| format!("Failed to create simulations table: {}", e))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_simulations_user ON simulations(user_id)",
            [],
        )
        .map_err(|e| format!("Failed to create user index: {}", e))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_simulations_created ON simulations(created_at DESC)",
            [],
        )
        .map_err(|e| format!("Failed to create date index: {}", e))?;

        info!("Opened simulation history database at {:?}", db_path);
        Ok(Self { conn })
    }

    /// Create the profile row for a user if it does not exist yet.
    /// New profiles start on the free plan with its standard credit grant.
    pub fn ensure_profile(&self, user_id: &str) -> Result<Profile, String> {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO profiles (user_id, simulations_remaining)
                 VALUES (?1, ?2)",
                params![user_id, FREE_TIER_SIMULATIONS],
            )
            .map_err(|e| format!("Failed to ensure profile: {}", e))?;
        self.get_profile(user_id)?
            .ok_or_else(|| format!("Profile missing after insert: {}", user_id))
    }

    pub fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, String> {
        self.conn
            .query_row(
                "SELECT user_id, display_name, clinic, plan, simulations_remaining, created_at
                 FROM profiles WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(Profile {
                        user_id: row.get(0)?,
                        display_name: row.get(1)?,
                        clinic: row.get(2)?,
                        plan: row.get(3)?,
                        simulations_remaining: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                },
            )
            .optional()
            .map_err(|e| format!("Failed to query profile: {}", e))
    }

    /// Remaining simulation credits for a user (0 if no profile).
    pub fn remaining_simulations(&self, user_id: &str) -> Result<i64, String> {
        Ok(self
            .get_profile(user_id)?
            .map(|p| p.simulations_remaining)
            .unwrap_or(0))
    }

    /// Spend one simulation credit. Returns the remaining count after the
    /// decrement, or `None` when the user had no credits left. The guarded
    /// UPDATE makes the check-and-decrement atomic.
    pub fn consume_simulation(&self, user_id: &str) -> Result<Option<i64>, String> {
        let changed = self
            .conn
            .execute(
                "UPDATE profiles
                 SET simulations_remaining = simulations_remaining - 1
                 WHERE user_id = ?1 AND simulations_remaining > 0",
                params![user_id],
            )
            .map_err(|e| format!("Failed to consume simulation credit: {}", e))?;

        if changed == 0 {
            return Ok(None);
        }
        let remaining = self.remaining_simulations(user_id)?;
        info!(
            "Consumed simulation credit for {}: {} remaining",
            user_id, remaining
        );
        Ok(Some(remaining))
    }

    /// Change a user's plan and set their credit balance to the grant.
    pub fn set_plan(&self, user_id: &str, plan: &str, grant: i64) -> Result<(), String> {
        let changed = self
            .conn
            .execute(
                "UPDATE profiles SET plan = ?1, simulations_remaining = ?2 WHERE user_id = ?3",
                params![plan, grant, user_id],
            )
            .map_err(|e| format!("Failed to update plan: {}", e))?;
        if changed == 0 {
            return Err(format!("No profile for user: {}", user_id));
        }
        info!("Set plan '{}' ({} credits) for {}", plan, grant, user_id);
        Ok(())
    }

    /// Record a completed simulation. Returns the new row ID.
    pub fn record_simulation(
        &self,
        user_id: &str,
        original_photo: &str,
        result_image: Option<&str>,
        adjustments: &AdjustmentsState,
        prompt: &str,
    ) -> Result<i64, String> {
        let adjustments_json = serde_json::to_string(adjustments)
            .map_err(|e| format!("Failed to serialize adjustments: {}", e))?;

        self.conn
            .execute(
                "INSERT INTO simulations (user_id, original_photo, result_image, adjustments_json, prompt)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![user_id, original_photo, result_image, adjustments_json, prompt],
            )
            .map_err(|e| format!("Failed to insert simulation: {}", e))?;

        let id = self.conn.last_insert_rowid();
        info!("Recorded simulation {} for user {}", id, user_id);
        Ok(id)
    }

    /// List all simulations for a user, newest first.
    pub fn list_simulations(&self, user_id: &str) -> Result<Vec<SimulationSummary>, String> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, created_at, result_image IS NOT NULL as has_result
                 FROM simulations
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC",
            )
            .map_err(|e| format!("Failed to prepare query: {}", e))?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(SimulationSummary {
                    id: row.get(0)?,
                    created_at: row.get(1)?,
                    has_result: row.get(2)?,
                })
            })
            .map_err(|e| format!("Failed to query simulations: {}", e))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("Failed to collect simulations: {}", e))
    }

    /// Get full details of a saved simulation.
    pub fn get_simulation(&self, simulation_id: i64) -> Result<SimulationDetail, String> {
        self.conn
            .query_row(
                "SELECT id, user_id, original_photo, result_image, adjustments_json, prompt, created_at
                 FROM simulations WHERE id = ?1",
                params![simulation_id],
                |row| {
                    let adjustments_json: String = row.get(4)?;
                    let adjustments =
                        serde_json::from_str(&adjustments_json).unwrap_or_default();

                    Ok(SimulationDetail {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        original_photo: row.get(2)?,
                        result_image: row.get(3)?,
                        adjustments,
                        prompt: row.get(5)?,
                        created_at: row.get(6)?,
                    })
                },
            )
            .map_err(|e| format!("Simulation not found: {}", e))
    }

    /// Delete a saved simulation. Quota credits are never refunded.
    pub fn delete_simulation(&self, simulation_id: i64) -> Result<(), String> {
        let changed = self
            .conn
            .execute(
                "DELETE FROM simulations WHERE id = ?1",
                params![simulation_id],
            )
            .map_err(|e| format!("Failed to delete simulation: {}", e))?;
        if changed == 0 {
            return Err(format!("Simulation not found: {}", simulation_id));
        }
        info!("Deleted simulation {}", simulation_id);
        Ok(())
    }
}
