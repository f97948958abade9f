//! Read-model assembly and admin write dispatch for the portfolio
//! content: profile, stat tiles, about section, projects.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::db::DbPool;
use crate::models::about::{About, AboutForm};
use crate::models::profile::{Profile, ProfileForm};
use crate::models::project::{Project, ProjectForm};
use crate::models::stat::{Stat, StatForm};
use crate::seed;

/// The unified read-model served to both the public page and the
/// admin dashboard.
#[derive(Debug, Serialize)]
pub struct PortfolioData {
    pub profile: Profile,
    pub stats: Vec<Stat>,
    pub about: About,
    pub projects: Vec<Project>,
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("invalid payload: {0}")]
    Validation(String),
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("project {0} not found")]
    NotFound(i64),
}

/// Admin write envelope: `{"type": "...", "data": ...}`, each variant
/// validated against its own form shape before touching storage.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum SavePayload {
    Profile(ProfileForm),
    Stats(Vec<StatForm>),
    About(AboutForm),
    Projects(Vec<ProjectForm>),
}

impl PortfolioData {
    /// Fetch everything, lazily seeding whatever is missing and
    /// re-reading afterwards so the served content is always complete.
    /// `include_unpublished` distinguishes the admin read (drafts
    /// included) from the public one.
    pub fn fetch(pool: &DbPool, include_unpublished: bool) -> Result<Self, String> {
        let profile = match Profile::get(pool) {
            Some(p) => p,
            None => {
                Profile::ensure_seeded(pool, &seed::default_profile())?;
                Profile::get(pool).ok_or_else(|| "profile seeding failed".to_string())?
            }
        };

        if Stat::count(pool) == 0 {
            // The transactional replace makes a concurrent first read
            // converge on a single seed list.
            Stat::replace_all(pool, &seed::default_stats())?;
        }
        let stats = Stat::list(pool);

        let about = match About::get(pool) {
            Some(a) => a,
            None => {
                About::ensure_seeded(pool, &seed::default_about())?;
                About::get(pool).ok_or_else(|| "about seeding failed".to_string())?
            }
        };

        if Project::count(pool) == 0 {
            Project::save_many(pool, &seed::default_projects())?;
        }
        let projects = Project::list(pool, !include_unpublished);

        Ok(PortfolioData {
            profile,
            stats,
            about,
            projects,
        })
    }
}

/// Dispatch an admin save. The payload is validated into `SavePayload`
/// first; storage is only touched once the shape is known-good.
pub fn save(pool: &DbPool, payload: Value) -> Result<(), SaveError> {
    let payload: SavePayload =
        serde_json::from_value(payload).map_err(|e| SaveError::Validation(e.to_string()))?;

    match payload {
        SavePayload::Profile(form) => Profile::save(pool, &form).map_err(SaveError::Storage),
        SavePayload::Stats(list) => Stat::replace_all(pool, &list).map_err(SaveError::Storage),
        SavePayload::About(form) => About::save(pool, &form).map_err(SaveError::Storage),
        SavePayload::Projects(list) => Project::save_many(pool, &list)
            .map(|_| ())
            .map_err(SaveError::Storage),
    }
}

pub fn delete_project(pool: &DbPool, id: i64) -> Result<(), SaveError> {
    match Project::delete(pool, id) {
        Ok(0) => Err(SaveError::NotFound(id)),
        Ok(_) => Ok(()),
        Err(e) => Err(SaveError::Storage(e)),
    }
}
