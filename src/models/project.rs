use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub domain: String,
    pub badge: String,
    pub description: String,
    /// Multi-paragraph body, paragraphs separated by blank lines.
    pub details: String,
    pub card_gradient: String,
    pub card_label: String,
    pub youtube_id: Option<String>,
    pub github_url: Option<String>,
    pub images: Vec<String>,
    pub published: bool,
    pub view_count: i64,
    #[serde(rename = "order")]
    pub sort_order: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Ids round-trip as integers, but the editor also sends string markers
/// ("new-1712…", or a bare timestamp) for rows it created optimistically
/// before the first persist.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum ClientId {
    Id(i64),
    Marker(String),
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProjectForm {
    #[serde(default)]
    pub id: Option<ClientId>,
    pub title: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub badge: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub card_gradient: String,
    #[serde(default)]
    pub card_label: String,
    #[serde(default)]
    pub youtube_id: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(rename = "order", default)]
    pub sort_order: i64,
}

fn default_published() -> bool {
    true
}

impl Project {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let images_raw: String = row.get("images")?;
        let published_raw: i64 = row.get("published")?;
        Ok(Project {
            id: row.get("id")?,
            title: row.get("title")?,
            domain: row.get("domain")?,
            badge: row.get("badge")?,
            description: row.get("description")?,
            details: row.get("details")?,
            card_gradient: row.get("card_gradient")?,
            card_label: row.get("card_label")?,
            youtube_id: row.get("youtube_id")?,
            github_url: row.get("github_url")?,
            images: serde_json::from_str(&images_raw).unwrap_or_default(),
            published: published_raw != 0,
            view_count: row.get("view_count")?,
            sort_order: row.get("sort_order")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM projects WHERE id = ?1",
            params![id],
            Self::from_row,
        )
        .ok()
    }

    pub fn exists(pool: &DbPool, id: i64) -> bool {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return false,
        };
        conn.query_row(
            "SELECT COUNT(*) FROM projects WHERE id = ?1",
            params![id],
            |row| row.get::<_, i64>(0),
        )
        .map(|c| c > 0)
        .unwrap_or(false)
    }

    /// Ordered project list; `published_only` is what separates the
    /// public read from the admin read.
    pub fn list(pool: &DbPool, published_only: bool) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };

        let sql = if published_only {
            "SELECT * FROM projects WHERE published = 1 ORDER BY sort_order ASC"
        } else {
            "SELECT * FROM projects ORDER BY sort_order ASC"
        };

        let mut stmt = match conn.prepare(sql) {
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
        conn.query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))
            .unwrap_or(0)
    }

    pub fn create(pool: &DbPool, form: &ProjectForm) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let images = serde_json::to_string(&form.images).map_err(|e| e.to_string())?;

        conn.execute(
            "INSERT INTO projects (title, domain, badge, description, details, card_gradient,
             card_label, youtube_id, github_url, images, published, sort_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                form.title,
                form.domain,
                form.badge,
                form.description,
                form.details,
                form.card_gradient,
                form.card_label,
                form.youtube_id,
                form.github_url,
                images,
                form.published as i64,
                form.sort_order,
            ],
        )
        .map_err(|e| e.to_string())?;

        Ok(conn.last_insert_rowid())
    }

    /// In-place update of every editor-owned field. `view_count` is
    /// deliberately absent: only the event recorder touches it.
    pub fn update(pool: &DbPool, id: i64, form: &ProjectForm) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let images = serde_json::to_string(&form.images).map_err(|e| e.to_string())?;

        conn.execute(
            "UPDATE projects SET title=?1, domain=?2, badge=?3, description=?4, details=?5,
             card_gradient=?6, card_label=?7, youtube_id=?8, github_url=?9, images=?10,
             published=?11, sort_order=?12, updated_at=CURRENT_TIMESTAMP WHERE id=?13",
            params![
                form.title,
                form.domain,
                form.badge,
                form.description,
                form.details,
                form.card_gradient,
                form.card_label,
                form.youtube_id,
                form.github_url,
                images,
                form.published as i64,
                form.sort_order,
                id,
            ],
        )
        .map_err(|e| e.to_string())?;

        Ok(())
    }

    /// Bulk save from the editor. An incoming id is honored only when it
    /// resolves to an existing row; anything else (missing id, "new-…"
    /// marker, optimistic timestamp) becomes an insert and the client id
    /// never reaches storage. Omitted projects are left alone; removal
    /// is the explicit `delete` below.
    pub fn save_many(pool: &DbPool, forms: &[ProjectForm]) -> Result<Vec<i64>, String> {
        let mut ids = Vec::with_capacity(forms.len());

        for form in forms {
            let existing = match &form.id {
                Some(ClientId::Id(n)) if Self::exists(pool, *n) => Some(*n),
                Some(ClientId::Marker(s)) => s
                    .parse::<i64>()
                    .ok()
                    .filter(|n| Self::exists(pool, *n)),
                _ => None,
            };

            match existing {
                Some(id) => {
                    Self::update(pool, id, form)?;
                    ids.push(id);
                }
                None => ids.push(Self::create(pool, form)?),
            }
        }

        Ok(ids)
    }

    pub fn delete(pool: &DbPool, id: i64) -> Result<usize, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM projects WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())
    }

    /// Single-statement increment so concurrent viewers never lose
    /// updates to a read-modify-write race.
    pub fn increment_view_count(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "UPDATE projects SET view_count = view_count + 1 WHERE id = ?1",
            params![id],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn top_viewed(pool: &DbPool, limit: i64) -> Vec<ProjectViewCount> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };

        let mut stmt = match conn.prepare(
            "SELECT id, title, view_count FROM projects
             ORDER BY view_count DESC LIMIT ?1",
        ) {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        stmt.query_map(params![limit], |row| {
            Ok(ProjectViewCount {
                id: row.get(0)?,
                title: row.get(1)?,
                view_count: row.get(2)?,
            })
        })
        .map(|rows| rows.filter_map(|r| r.ok()).collect())
        .unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectViewCount {
    pub id: i64,
    pub title: String,
    pub view_count: i64,
}
