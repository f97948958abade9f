use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

/// The profile is a singleton pinned to rowid 1; seeding with
/// `INSERT OR IGNORE` on that rowid makes first-read seeding
/// exactly-once even when concurrent requests race on an empty store.
const SINGLETON_ID: i64 = 1;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub greeting: String,
    pub name: String,
    pub title: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub profile_image: String,
    pub resume_url: String,
    pub linkedin_url: String,
    pub github_url: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub greeting: String,
    pub name: String,
    pub title: String,
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub profile_image: String,
    #[serde(default)]
    pub resume_url: String,
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub github_url: String,
}

impl Profile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let skills_raw: String = row.get("skills")?;
        Ok(Profile {
            id: row.get("id")?,
            greeting: row.get("greeting")?,
            name: row.get("name")?,
            title: row.get("title")?,
            bio: row.get("bio")?,
            skills: serde_json::from_str(&skills_raw).unwrap_or_default(),
            profile_image: row.get("profile_image")?,
            resume_url: row.get("resume_url")?,
            linkedin_url: row.get("linkedin_url")?,
            github_url: row.get("github_url")?,
        })
    }

    pub fn get(pool: &DbPool) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM profile WHERE id = ?1",
            params![SINGLETON_ID],
            Self::from_row,
        )
        .ok()
    }

    /// Insert the given defaults unless the singleton row already exists.
    pub fn ensure_seeded(pool: &DbPool, form: &ProfileForm) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let skills = serde_json::to_string(&form.skills).map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT OR IGNORE INTO profile
             (id, greeting, name, title, bio, skills, profile_image, resume_url, linkedin_url, github_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                SINGLETON_ID,
                form.greeting,
                form.name,
                form.title,
                form.bio,
                skills,
                form.profile_image,
                form.resume_url,
                form.linkedin_url,
                form.github_url,
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Wholesale replace of every field on the singleton row.
    pub fn save(pool: &DbPool, form: &ProfileForm) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let skills = serde_json::to_string(&form.skills).map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO profile
             (id, greeting, name, title, bio, skills, profile_image, resume_url, linkedin_url, github_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(id) DO UPDATE SET
                greeting = ?2, name = ?3, title = ?4, bio = ?5, skills = ?6,
                profile_image = ?7, resume_url = ?8, linkedin_url = ?9, github_url = ?10,
                updated_at = CURRENT_TIMESTAMP",
            params![
                SINGLETON_ID,
                form.greeting,
                form.name,
                form.title,
                form.bio,
                skills,
                form.profile_image,
                form.resume_url,
                form.linkedin_url,
                form.github_url,
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }
}
