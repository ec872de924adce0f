use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::history::FilterState;
use crate::api::ApiError;
use crate::db::Database;

const MAX_PRESET_NAME_LEN: usize = 40;

/// Named filter subset saved on this device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPreset {
    pub name: String,
    pub filters: FilterState,
    pub created_at: i64,
    pub updated_at: i64,
}

pub struct PresetStore {
    db: Arc<Database>,
}

impl PresetStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert or overwrite the preset called `name`.
    pub fn save(&self, name: &str, filters: &FilterState) -> Result<FilterPreset, ApiError> {
        let name = validate_name(name)?;
        let filters_json = serde_json::to_string(&filters.normalized())?;
        let now = Utc::now().timestamp();

        {
            let conn = self.db.conn.lock().map_err(|e| ApiError::DatabaseError(e.to_string()))?;
            conn.execute(
                "INSERT INTO filter_presets (name, filters_json, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)
                 ON CONFLICT(name) DO UPDATE SET filters_json = excluded.filters_json, updated_at = excluded.updated_at",
                params![name, filters_json, now],
            )?;
        }

        log::debug!("Saved filter preset '{}'", name);

        self.get(&name)?
            .ok_or_else(|| ApiError::DatabaseError(format!("Preset '{}' missing after save", name)))
    }

    pub fn list(&self) -> Result<Vec<FilterPreset>, ApiError> {
        let conn = self.db.conn.lock().map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        let mut stmt = conn.prepare(
            "SELECT name, filters_json, created_at, updated_at FROM filter_presets ORDER BY name COLLATE NOCASE",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(name, json, created_at, updated_at)| to_preset(name, &json, created_at, updated_at))
            .collect()
    }

    pub fn get(&self, name: &str) -> Result<Option<FilterPreset>, ApiError> {
        let conn = self.db.conn.lock().map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        let row = conn
            .query_row(
                "SELECT name, filters_json, created_at, updated_at FROM filter_presets WHERE name = ?",
                [name.trim()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(name, json, created_at, updated_at)| to_preset(name, &json, created_at, updated_at))
            .transpose()
    }

    /// Returns whether a preset was removed.
    pub fn delete(&self, name: &str) -> Result<bool, ApiError> {
        let conn = self.db.conn.lock().map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        let removed = conn.execute("DELETE FROM filter_presets WHERE name = ?", [name.trim()])?;
        Ok(removed > 0)
    }
}

fn to_preset(name: String, json: &str, created_at: i64, updated_at: i64) -> Result<FilterPreset, ApiError> {
    Ok(FilterPreset {
        name,
        filters: serde_json::from_str(json)?,
        created_at,
        updated_at,
    })
}

fn validate_name(name: &str) -> Result<String, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::InvalidInput("Preset name is required".to_string()));
    }
    if name.chars().count() > MAX_PRESET_NAME_LEN {
        return Err(ApiError::InvalidInput(format!(
            "Preset name must be at most {} characters",
            MAX_PRESET_NAME_LEN
        )));
    }
    Ok(name.to_string())
}
