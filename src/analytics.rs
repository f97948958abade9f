//! Visit recording. Fire-and-forget: nothing in here may break the
//! page that triggered it, so failures are logged and swallowed.

use log::warn;

use crate::db::DbPool;
use crate::models::analytics::{VisitEvent, VisitorSession};
use crate::models::project::Project;

/// Append one visit event, roll the session summary forward, and bump
/// the project view counter when a project page was hit.
///
/// Visitor and session ids are client-generated opaque strings and
/// arrive untrusted; a missing visitor id is recorded as "anonymous"
/// and a missing session id gets a throwaway uuid so the event still
/// lands.
pub fn record_visit(
    pool: &DbPool,
    page: &str,
    project_id: Option<i64>,
    visitor_id: Option<&str>,
    session_id: Option<&str>,
    ip_address: Option<&str>,
    user_agent: Option<&str>,
) {
    let visitor_id = match visitor_id.filter(|v| !v.is_empty()) {
        Some(v) => v.to_string(),
        None => "anonymous".to_string(),
    };
    let session_id = match session_id.filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => uuid::Uuid::new_v4().to_string(),
    };

    if let Err(e) = VisitEvent::record(
        pool,
        page,
        project_id,
        &visitor_id,
        &session_id,
        ip_address,
        user_agent,
    ) {
        warn!("visit event for {} not recorded: {}", page, e);
    }

    if let Err(e) = VisitorSession::upsert(pool, &session_id, &visitor_id, page) {
        warn!("session {} not updated: {}", session_id, e);
    }

    if let Some(pid) = project_id {
        if let Err(e) = Project::increment_view_count(pool, pid) {
            warn!("view count for project {} not bumped: {}", pid, e);
        }
    }
}
