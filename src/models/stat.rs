use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Stat {
    pub id: i64,
    pub number: String,
    pub label: String,
    pub icon: String,
    pub background: String,
    #[serde(rename = "order")]
    pub sort_order: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatForm {
    pub number: String,
    pub label: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub background: String,
    #[serde(rename = "order", default)]
    pub sort_order: i64,
}

impl Stat {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Stat {
            id: row.get("id")?,
            number: row.get("number")?,
            label: row.get("label")?,
            icon: row.get("icon")?,
            background: row.get("background")?,
            sort_order: row.get("sort_order")?,
        })
    }

    pub fn list(pool: &DbPool) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };

        let mut stmt = match conn.prepare("SELECT * FROM stats ORDER BY sort_order ASC") {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        stmt.query_map([], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn count(pool: &DbPool) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row("SELECT COUNT(*) FROM stats", [], |row| row.get(0))
            .unwrap_or(0)
    }

    /// Delete-all-then-insert inside one transaction. A failed insert
    /// rolls the whole replace back, so the prior list survives and the
    /// empty-table window is never observable.
    pub fn replace_all(pool: &DbPool, list: &[StatForm]) -> Result<(), String> {
        let mut conn = pool.get().map_err(|e| e.to_string())?;
        let tx = conn.transaction().map_err(|e| e.to_string())?;

        tx.execute("DELETE FROM stats", [])
            .map_err(|e| e.to_string())?;

        for stat in list {
            tx.execute(
                "INSERT INTO stats (number, label, icon, background, sort_order)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![stat.number, stat.label, stat.icon, stat.background, stat.sort_order],
            )
            .map_err(|e| e.to_string())?;
        }

        tx.commit().map_err(|e| e.to_string())
    }
}
