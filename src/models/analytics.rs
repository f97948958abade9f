use chrono::{Duration, NaiveDateTime, Utc};
use rusqlite::{params, Row};
use serde::Serialize;

use crate::db::DbPool;
use crate::models::project::{Project, ProjectViewCount};

/// One page or project view. Append-only; rows are never updated.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitEvent {
    pub id: i64,
    pub visitor_id: String,
    pub session_id: String,
    pub page: String,
    pub project_id: Option<i64>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Rolling per-session summary, one row per session id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorSession {
    pub session_id: String,
    pub visitor_id: String,
    pub page_views: i64,
    pub last_page: String,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize)]
pub struct DailyVisits {
    pub date: String,
    pub visits: i64,
}

#[derive(Debug, Serialize)]
pub struct PageCount {
    pub page: String,
    pub views: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorActivity {
    pub visitor_id: String,
    pub total_visits: i64,
    pub first_visit: NaiveDateTime,
    pub last_visit: NaiveDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_visits: i64,
    pub unique_visitors: i64,
    pub daily_visits: Vec<DailyVisits>,
    pub page_views: Vec<PageCount>,
    pub project_views: Vec<ProjectViewCount>,
    pub recent_sessions: Vec<VisitorSession>,
    pub recent_visitors: Vec<VisitorActivity>,
}

impl VisitEvent {
    /// Timestamps are always written from chrono rather than SQL
    /// CURRENT_TIMESTAMP so stored values and query parameters share
    /// one format.
    pub fn record(
        pool: &DbPool,
        page: &str,
        project_id: Option<i64>,
        visitor_id: &str,
        session_id: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let now = Utc::now().naive_utc();
        conn.execute(
            "INSERT INTO visit_events (visitor_id, session_id, page, project_id, ip_address, user_agent, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![visitor_id, session_id, page, project_id, ip_address, user_agent, now],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn count(pool: &DbPool) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row("SELECT COUNT(*) FROM visit_events", [], |row| row.get(0))
            .unwrap_or(0)
    }

    pub fn count_for_session(pool: &DbPool, session_id: &str) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row(
            "SELECT COUNT(*) FROM visit_events WHERE session_id = ?1",
            params![session_id],
            |row| row.get(0),
        )
        .unwrap_or(0)
    }
}

impl VisitorSession {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(VisitorSession {
            session_id: row.get("session_id")?,
            visitor_id: row.get("visitor_id")?,
            page_views: row.get("page_views")?,
            last_page: row.get("last_page")?,
            start_time: row.get("start_time")?,
            end_time: row.get("end_time")?,
        })
    }

    /// Single-statement upsert: concurrent events for one session id
    /// serialize inside SQLite, so page_views never loses an update.
    pub fn upsert(
        pool: &DbPool,
        session_id: &str,
        visitor_id: &str,
        page: &str,
    ) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let now = Utc::now().naive_utc();
        conn.execute(
            "INSERT INTO visit_sessions (session_id, visitor_id, page_views, last_page, start_time)
             VALUES (?1, ?2, 1, ?3, ?4)
             ON CONFLICT(session_id) DO UPDATE SET
                page_views = page_views + 1,
                last_page = excluded.last_page,
                end_time = ?4",
            params![session_id, visitor_id, page, now],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn find(pool: &DbPool, session_id: &str) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM visit_sessions WHERE session_id = ?1",
            params![session_id],
            Self::from_row,
        )
        .ok()
    }

    pub fn recent(pool: &DbPool, limit: i64) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };

        let mut stmt = match conn
            .prepare("SELECT * FROM visit_sessions ORDER BY start_time DESC LIMIT ?1")
        {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        stmt.query_map(params![limit], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }
}

impl AnalyticsSummary {
    /// Computed fresh on every call; no materialized rollup. Exact
    /// GROUP BYs are fine at personal-site volumes.
    pub fn compute(pool: &DbPool) -> Self {
        let window_start = Utc::now().naive_utc() - Duration::days(30);

        AnalyticsSummary {
            total_visits: VisitEvent::count(pool),
            unique_visitors: Self::unique_visitors(pool),
            daily_visits: Self::daily_visits(pool, window_start),
            page_views: Self::page_views(pool),
            project_views: Project::top_viewed(pool, 10),
            recent_sessions: VisitorSession::recent(pool, 20),
            recent_visitors: Self::recent_visitors(pool, 20),
        }
    }

    fn unique_visitors(pool: &DbPool) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row(
            "SELECT COUNT(DISTINCT visitor_id) FROM visit_events",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0)
    }

    fn daily_visits(pool: &DbPool, window_start: NaiveDateTime) -> Vec<DailyVisits> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };

        let mut stmt = match conn.prepare(
            "SELECT DATE(created_at) as date, COUNT(*) as visits
             FROM visit_events
             WHERE created_at >= ?1
             GROUP BY date
             ORDER BY date",
        ) {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        stmt.query_map(params![window_start], |row| {
            Ok(DailyVisits {
                date: row.get(0)?,
                visits: row.get(1)?,
            })
        })
        .map(|rows| rows.filter_map(|r| r.ok()).collect())
        .unwrap_or_default()
    }

    fn page_views(pool: &DbPool) -> Vec<PageCount> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };

        let mut stmt = match conn.prepare(
            "SELECT page, COUNT(*) as views
             FROM visit_events
             GROUP BY page
             ORDER BY views DESC",
        ) {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        stmt.query_map([], |row| {
            Ok(PageCount {
                page: row.get(0)?,
                views: row.get(1)?,
            })
        })
        .map(|rows| rows.filter_map(|r| r.ok()).collect())
        .unwrap_or_default()
    }

    fn recent_visitors(pool: &DbPool, limit: i64) -> Vec<VisitorActivity> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };

        let mut stmt = match conn.prepare(
            "SELECT visitor_id, COUNT(*) as total,
                    MIN(created_at) as first_seen, MAX(created_at) as last_seen
             FROM visit_events
             GROUP BY visitor_id
             ORDER BY last_seen DESC
             LIMIT ?1",
        ) {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        stmt.query_map(params![limit], |row| {
            Ok(VisitorActivity {
                visitor_id: row.get(0)?,
                total_visits: row.get(1)?,
                first_visit: row.get(2)?,
                last_visit: row.get(3)?,
            })
        })
        .map(|rows| rows.filter_map(|r| r.ok()).collect())
        .unwrap_or_default()
    }
}
