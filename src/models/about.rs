use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

// Singleton pinned to rowid 1, same lifecycle as Profile.
const SINGLETON_ID: i64 = 1;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct About {
    pub id: i64,
    pub description: String,
    pub tools: Vec<String>,
    pub expertise: Vec<String>,
    pub conclusion: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AboutForm {
    pub description: String,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub conclusion: String,
}

impl About {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let tools_raw: String = row.get("tools")?;
        let expertise_raw: String = row.get("expertise")?;
        Ok(About {
            id: row.get("id")?,
            description: row.get("description")?,
            tools: serde_json::from_str(&tools_raw).unwrap_or_default(),
            expertise: serde_json::from_str(&expertise_raw).unwrap_or_default(),
            conclusion: row.get("conclusion")?,
        })
    }

    pub fn get(pool: &DbPool) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM about WHERE id = ?1",
            params![SINGLETON_ID],
            Self::from_row,
        )
        .ok()
    }

    pub fn ensure_seeded(pool: &DbPool, form: &AboutForm) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let tools = serde_json::to_string(&form.tools).map_err(|e| e.to_string())?;
        let expertise = serde_json::to_string(&form.expertise).map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT OR IGNORE INTO about (id, description, tools, expertise, conclusion)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![SINGLETON_ID, form.description, tools, expertise, form.conclusion],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn save(pool: &DbPool, form: &AboutForm) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let tools = serde_json::to_string(&form.tools).map_err(|e| e.to_string())?;
        let expertise = serde_json::to_string(&form.expertise).map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO about (id, description, tools, expertise, conclusion)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                description = ?2, tools = ?3, expertise = ?4, conclusion = ?5,
                updated_at = CURRENT_TIMESTAMP",
            params![SINGLETON_ID, form.description, tools, expertise, form.conclusion],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }
}
