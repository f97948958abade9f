use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::Serialize;
use serde_json::{json, Value};

use crate::db::DbPool;

/// Admin account. Content code only reads these; rows are created by
/// `db::seed_defaults` (or an operator working on the DB directly).
#[derive(Debug, Serialize, Clone)]
pub struct Admin {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

impl Admin {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Admin {
            id: row.get("id")?,
            email: row.get("email")?,
            password_hash: row.get("password_hash")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM admins WHERE id = ?1",
            params![id],
            Self::from_row,
        )
        .ok()
    }

    pub fn find_by_email(pool: &DbPool, email: &str) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM admins WHERE email = ?1",
            params![email],
            Self::from_row,
        )
        .ok()
    }

    pub fn create(pool: &DbPool, email: &str, password_hash: &str) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO admins (email, password_hash) VALUES (?1, ?2)",
            params![email, password_hash],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    pub fn count(pool: &DbPool) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row("SELECT COUNT(*) FROM admins", [], |row| row.get(0))
            .unwrap_or(0)
    }

    /// JSON shape handed to the dashboard after login; never includes the hash.
    pub fn safe_json(&self) -> Value {
        json!({ "id": self.id, "email": self.email })
    }
}
