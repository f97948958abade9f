#![cfg(test)]

use chrono::{Duration, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use crate::analytics::record_visit;
use crate::auth;
use crate::db::{run_migrations, seed_defaults, DbPool};
use crate::models::about::{About, AboutForm};
use crate::models::admin::Admin;
use crate::models::analytics::{AnalyticsSummary, VisitEvent, VisitorSession};
use crate::models::profile::Profile;
use crate::models::project::{ClientId, Project, ProjectForm};
use crate::models::settings::Setting;
use crate::models::stat::{Stat, StatForm};
use crate::portfolio::{self, PortfolioData, SaveError};
use crate::rate_limit::RateLimiter;
use crate::seed;

/// Atomic counter for unique shared-cache DB names so parallel tests don't collide.
static TEST_DB_COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

/// Create a fresh in-memory SQLite pool with migrations + seed defaults
/// applied. Uses a named shared-cache in-memory DB so multiple
/// connections see the same data. Pre-seeds an admin row with a fast
/// bcrypt hash so seed_defaults skips the expensive DEFAULT_COST hash
/// (which can take seconds per test in debug builds).
fn test_pool() -> DbPool {
    let id = TEST_DB_COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    let uri = format!("file:testdb_{}?mode=memory&cache=shared", id);
    let manager = SqliteConnectionManager::file(uri);
    let pool = Pool::builder()
        .max_size(2)
        .build(manager)
        .expect("Failed to create test pool");
    run_migrations(&pool).expect("Failed to run migrations");
    {
        let conn = pool.get().unwrap();
        let fast = fast_hash("admin123");
        conn.execute(
            "INSERT INTO admins (email, password_hash) VALUES ('admin@portfolio.com', ?1)",
            params![fast],
        )
        .unwrap();
    }
    seed_defaults(&pool).expect("Failed to seed defaults");
    pool
}

/// Disk-backed pool for the concurrency tests: shared-cache in-memory
/// databases hand out table-lock errors under real write contention,
/// while a WAL file with a busy timeout serializes writers the same
/// way production does.
fn disk_pool(max_size: u32) -> (tempfile::TempDir, DbPool) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("folio_test.db");
    let manager = SqliteConnectionManager::file(path).with_init(|c| {
        c.execute_batch("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;")
    });
    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)
        .expect("Failed to create disk pool");
    run_migrations(&pool).expect("Failed to run migrations");
    (dir, pool)
}

/// Fast bcrypt hash for tests (cost=4 instead of DEFAULT_COST=12).
fn fast_hash(password: &str) -> String {
    bcrypt::hash(password, 4).unwrap()
}

fn make_stat(number: &str, label: &str, order: i64) -> StatForm {
    StatForm {
        number: number.to_string(),
        label: label.to_string(),
        icon: "★".to_string(),
        background: "#333333".to_string(),
        sort_order: order,
    }
}

fn make_project_form(title: &str, published: bool, order: i64) -> ProjectForm {
    ProjectForm {
        id: None,
        title: title.to_string(),
        domain: "Testing".to_string(),
        badge: "Test Project".to_string(),
        description: "A project used in tests.".to_string(),
        details: "Situation: tests.\n\nResult: assertions.".to_string(),
        card_gradient: "linear-gradient(45deg, #000, #fff)".to_string(),
        card_label: "TESTING".to_string(),
        youtube_id: None,
        github_url: Some("#".to_string()),
        images: vec!["/uploads/test.jpg".to_string()],
        published,
        sort_order: order,
    }
}

// ═══════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════

#[test]
fn settings_set_and_get() {
    let pool = test_pool();
    Setting::set(&pool, "test_key", "hello").unwrap();
    assert_eq!(Setting::get(&pool, "test_key"), Some("hello".to_string()));
}

#[test]
fn settings_get_or_default() {
    let pool = test_pool();
    assert_eq!(Setting::get_or(&pool, "nonexistent", "fallback"), "fallback");
    Setting::set(&pool, "exists", "val").unwrap();
    assert_eq!(Setting::get_or(&pool, "exists", "fallback"), "val");
}

#[test]
fn settings_get_i64() {
    let pool = test_pool();
    Setting::set(&pool, "num", "42").unwrap();
    assert_eq!(Setting::get_i64(&pool, "num"), 42);
    assert_eq!(Setting::get_i64(&pool, "missing"), 0);
}

#[test]
fn settings_upsert() {
    let pool = test_pool();
    Setting::set(&pool, "key", "first").unwrap();
    Setting::set(&pool, "key", "second").unwrap();
    assert_eq!(Setting::get(&pool, "key"), Some("second".to_string()));
}

// ═══════════════════════════════════════════════════════════
// Profile
// ═══════════════════════════════════════════════════════════

#[test]
fn profile_absent_until_seeded() {
    let pool = test_pool();
    assert!(Profile::get(&pool).is_none());

    Profile::ensure_seeded(&pool, &seed::default_profile()).unwrap();
    let profile = Profile::get(&pool).unwrap();
    assert_eq!(profile.name, "Naveen");
    assert_eq!(profile.greeting, "Hello, I am");
    assert_eq!(profile.skills.len(), 5);
    assert_eq!(profile.skills[0], "MACHINE LEARNING");
}

#[test]
fn profile_seed_is_exactly_once() {
    let pool = test_pool();
    Profile::ensure_seeded(&pool, &seed::default_profile()).unwrap();

    // A second seed attempt must not clobber edits.
    let mut form = seed::default_profile();
    form.name = "Alex".to_string();
    Profile::save(&pool, &form).unwrap();

    Profile::ensure_seeded(&pool, &seed::default_profile()).unwrap();
    assert_eq!(Profile::get(&pool).unwrap().name, "Alex");
}

#[test]
fn profile_save_replaces_all_fields() {
    let pool = test_pool();
    Profile::ensure_seeded(&pool, &seed::default_profile()).unwrap();

    let mut form = seed::default_profile();
    form.name = "Alex".to_string();
    form.title = "ML Engineer".to_string();
    form.skills = vec!["RUST".to_string()];
    Profile::save(&pool, &form).unwrap();

    let profile = Profile::get(&pool).unwrap();
    assert_eq!(profile.name, "Alex");
    assert_eq!(profile.title, "ML Engineer");
    assert_eq!(profile.skills, vec!["RUST".to_string()]);
}

// ═══════════════════════════════════════════════════════════
// Stats
// ═══════════════════════════════════════════════════════════

#[test]
fn stats_replace_all_exact_list() {
    let pool = test_pool();
    Stat::replace_all(&pool, &seed::default_stats()).unwrap();
    assert_eq!(Stat::count(&pool), 3);

    // Replace with a different list; nothing from before survives.
    let replacement = vec![make_stat("7", "Rust Projects", 1), make_stat("3", "Talks", 2)];
    Stat::replace_all(&pool, &replacement).unwrap();

    let stats = Stat::list(&pool);
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].label, "Rust Projects");
    assert_eq!(stats[1].label, "Talks");
}

#[test]
fn stats_list_ordered_by_sort_order() {
    let pool = test_pool();
    let list = vec![
        make_stat("c", "Third", 30),
        make_stat("a", "First", 10),
        make_stat("b", "Second", 20),
    ];
    Stat::replace_all(&pool, &list).unwrap();

    let stats = Stat::list(&pool);
    assert_eq!(stats[0].label, "First");
    assert_eq!(stats[1].label, "Second");
    assert_eq!(stats[2].label, "Third");
}

#[test]
fn stats_replace_with_empty_clears() {
    let pool = test_pool();
    Stat::replace_all(&pool, &seed::default_stats()).unwrap();
    Stat::replace_all(&pool, &[]).unwrap();
    assert_eq!(Stat::count(&pool), 0);
}

// ═══════════════════════════════════════════════════════════
// About
// ═══════════════════════════════════════════════════════════

#[test]
fn about_seed_and_save() {
    let pool = test_pool();
    assert!(About::get(&pool).is_none());

    About::ensure_seeded(&pool, &seed::default_about()).unwrap();
    let about = About::get(&pool).unwrap();
    assert_eq!(about.tools.len(), 3);
    assert_eq!(about.expertise.len(), 3);

    let form = AboutForm {
        description: "New description".to_string(),
        tools: vec!["Cargo".to_string()],
        expertise: vec!["Systems".to_string()],
        conclusion: "Done.".to_string(),
    };
    About::save(&pool, &form).unwrap();

    let about = About::get(&pool).unwrap();
    assert_eq!(about.description, "New description");
    assert_eq!(about.tools, vec!["Cargo".to_string()]);

    // Re-seeding after an edit is a no-op.
    About::ensure_seeded(&pool, &seed::default_about()).unwrap();
    assert_eq!(About::get(&pool).unwrap().description, "New description");
}

// ═══════════════════════════════════════════════════════════
// Projects
// ═══════════════════════════════════════════════════════════

#[test]
fn project_create_and_find() {
    let pool = test_pool();
    let id = Project::create(&pool, &make_project_form("Demo", true, 1)).unwrap();
    assert!(id > 0);

    let project = Project::find_by_id(&pool, id).unwrap();
    assert_eq!(project.title, "Demo");
    assert!(project.published);
    assert_eq!(project.view_count, 0);
    assert_eq!(project.images, vec!["/uploads/test.jpg".to_string()]);
}

#[test]
fn project_update_in_place() {
    let pool = test_pool();
    let id = Project::create(&pool, &make_project_form("Before", true, 1)).unwrap();

    let mut form = make_project_form("After", false, 2);
    form.youtube_id = Some("abc123".to_string());
    Project::update(&pool, id, &form).unwrap();

    let project = Project::find_by_id(&pool, id).unwrap();
    assert_eq!(project.title, "After");
    assert!(!project.published);
    assert_eq!(project.youtube_id, Some("abc123".to_string()));
    assert_eq!(Project::count(&pool), 1);
}

#[test]
fn project_published_filter() {
    let pool = test_pool();
    Project::create(&pool, &make_project_form("Live", true, 1)).unwrap();
    Project::create(&pool, &make_project_form("Draft", false, 2)).unwrap();

    let public = Project::list(&pool, true);
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].title, "Live");

    let all = Project::list(&pool, false);
    assert_eq!(all.len(), 2);
}

#[test]
fn project_list_ordered() {
    let pool = test_pool();
    Project::create(&pool, &make_project_form("Second", true, 2)).unwrap();
    Project::create(&pool, &make_project_form("First", true, 1)).unwrap();

    let projects = Project::list(&pool, true);
    assert_eq!(projects[0].title, "First");
    assert_eq!(projects[1].title, "Second");
}

#[test]
fn project_save_many_discards_temp_ids() {
    let pool = test_pool();

    // "new-…" marker and a bare optimistic timestamp both insert fresh.
    let mut with_marker = make_project_form("Marker", true, 1);
    with_marker.id = Some(ClientId::Marker("new-1712345678901".to_string()));
    let mut with_timestamp = make_project_form("Timestamp", true, 2);
    with_timestamp.id = Some(ClientId::Marker("1712345678901".to_string()));

    let ids = Project::save_many(&pool, &[with_marker, with_timestamp]).unwrap();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], 1712345678901);
    assert_ne!(ids[1], 1712345678901);
    assert_eq!(Project::count(&pool), 2);

    // No row kept the client id as its primary key.
    assert!(!Project::exists(&pool, 1712345678901));
}

#[test]
fn project_save_many_updates_existing() {
    let pool = test_pool();
    let id = Project::create(&pool, &make_project_form("Original", true, 1)).unwrap();

    let mut form = make_project_form("Renamed", true, 1);
    form.id = Some(ClientId::Id(id));
    let ids = Project::save_many(&pool, &[form]).unwrap();

    assert_eq!(ids, vec![id]);
    assert_eq!(Project::count(&pool), 1);
    assert_eq!(Project::find_by_id(&pool, id).unwrap().title, "Renamed");
}

#[test]
fn project_save_many_does_not_delete_omitted() {
    let pool = test_pool();
    let keep = Project::create(&pool, &make_project_form("Keep", true, 1)).unwrap();

    Project::save_many(&pool, &[make_project_form("New", true, 2)]).unwrap();

    assert_eq!(Project::count(&pool), 2);
    assert!(Project::exists(&pool, keep));
}

#[test]
fn project_delete_explicit() {
    let pool = test_pool();
    let id = Project::create(&pool, &make_project_form("Doomed", true, 1)).unwrap();

    assert_eq!(Project::delete(&pool, id).unwrap(), 1);
    assert!(Project::find_by_id(&pool, id).is_none());

    // Deleting again touches nothing.
    assert_eq!(Project::delete(&pool, id).unwrap(), 0);
}

#[test]
fn project_view_count_increments() {
    let pool = test_pool();
    let id = Project::create(&pool, &make_project_form("Watched", true, 1)).unwrap();

    Project::increment_view_count(&pool, id).unwrap();
    Project::increment_view_count(&pool, id).unwrap();
    Project::increment_view_count(&pool, id).unwrap();

    assert_eq!(Project::find_by_id(&pool, id).unwrap().view_count, 3);
}

#[test]
fn project_top_viewed_caps_and_orders() {
    let pool = test_pool();
    for i in 0..12 {
        let id = Project::create(&pool, &make_project_form(&format!("P{}", i), true, i)).unwrap();
        for _ in 0..i {
            Project::increment_view_count(&pool, id).unwrap();
        }
    }

    let top = Project::top_viewed(&pool, 10);
    assert_eq!(top.len(), 10);
    assert_eq!(top[0].title, "P11");
    assert_eq!(top[0].view_count, 11);
    assert!(top.windows(2).all(|w| w[0].view_count >= w[1].view_count));
}

// ═══════════════════════════════════════════════════════════
// Portfolio facade
// ═══════════════════════════════════════════════════════════

#[test]
fn fetch_seeds_fresh_store() {
    let pool = test_pool();
    let data = PortfolioData::fetch(&pool, false).unwrap();

    assert_eq!(data.profile.name, "Naveen");
    assert_eq!(data.stats.len(), 3);
    assert_eq!(data.about.tools.len(), 3);
    assert_eq!(data.projects.len(), 3);
    assert_eq!(data.projects[0].sort_order, 1);
    assert_eq!(data.projects[0].title, "AtliQ Hotels Data Analysis Project");
}

#[test]
fn fetch_is_stable_across_calls() {
    let pool = test_pool();
    let first = PortfolioData::fetch(&pool, false).unwrap();
    let second = PortfolioData::fetch(&pool, false).unwrap();

    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[test]
fn fetch_end_to_end_profile_edit() {
    let pool = test_pool();
    let data = PortfolioData::fetch(&pool, false).unwrap();
    assert_eq!(data.profile.name, "Naveen");

    let mut form = seed::default_profile();
    form.name = "Alex".to_string();
    Profile::save(&pool, &form).unwrap();

    assert_eq!(PortfolioData::fetch(&pool, false).unwrap().profile.name, "Alex");
}

#[test]
fn fetch_unpublished_visibility() {
    let pool = test_pool();
    PortfolioData::fetch(&pool, false).unwrap();
    Project::create(&pool, &make_project_form("Draft", false, 99)).unwrap();

    let public = PortfolioData::fetch(&pool, false).unwrap();
    assert!(public.projects.iter().all(|p| p.published));
    assert_eq!(public.projects.len(), 3);

    let admin = PortfolioData::fetch(&pool, true).unwrap();
    assert_eq!(admin.projects.len(), 4);
    assert!(admin.projects.iter().any(|p| !p.published));
}

#[test]
fn save_dispatch_profile() {
    let pool = test_pool();
    PortfolioData::fetch(&pool, false).unwrap();

    let payload = serde_json::json!({
        "type": "profile",
        "data": {
            "greeting": "Hi, I'm",
            "name": "Alex",
            "title": "Engineer",
            "bio": "Bio.",
            "skills": ["RUST"],
            "profileImage": "/uploads/me.jpg",
            "resumeUrl": "#",
            "linkedinUrl": "#",
            "githubUrl": "#"
        }
    });
    portfolio::save(&pool, payload).unwrap();

    let profile = Profile::get(&pool).unwrap();
    assert_eq!(profile.name, "Alex");
    assert_eq!(profile.profile_image, "/uploads/me.jpg");
}

#[test]
fn save_dispatch_stats_replaces() {
    let pool = test_pool();
    PortfolioData::fetch(&pool, false).unwrap();

    let payload = serde_json::json!({
        "type": "stats",
        "data": [
            {"number": "5", "label": "Rust Crates", "icon": "🦀", "background": "#b7410e", "order": 1}
        ]
    });
    portfolio::save(&pool, payload).unwrap();

    let stats = Stat::list(&pool);
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].label, "Rust Crates");
}

#[test]
fn save_dispatch_projects_mixed() {
    let pool = test_pool();
    let existing = Project::create(&pool, &make_project_form("Old", true, 1)).unwrap();

    let payload = serde_json::json!({
        "type": "projects",
        "data": [
            {"id": existing, "title": "Old, renamed", "order": 1},
            {"id": "new-1712345678901", "title": "Brand new", "order": 2}
        ]
    });
    portfolio::save(&pool, payload).unwrap();

    assert_eq!(Project::count(&pool), 2);
    assert_eq!(Project::find_by_id(&pool, existing).unwrap().title, "Old, renamed");
}

#[test]
fn save_rejects_unknown_type() {
    let pool = test_pool();
    let payload = serde_json::json!({"type": "widgets", "data": []});
    match portfolio::save(&pool, payload) {
        Err(SaveError::Validation(_)) => {}
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[test]
fn save_rejects_malformed_data() {
    let pool = test_pool();
    // Stats data must be a list.
    let payload = serde_json::json!({"type": "stats", "data": {"number": "1"}});
    assert!(matches!(
        portfolio::save(&pool, payload),
        Err(SaveError::Validation(_))
    ));
}

#[test]
fn delete_project_not_found() {
    let pool = test_pool();
    match portfolio::delete_project(&pool, 999) {
        Err(SaveError::NotFound(999)) => {}
        other => panic!("expected NotFound, got {:?}", other),
    }
}

// ═══════════════════════════════════════════════════════════
// Event recorder
// ═══════════════════════════════════════════════════════════

#[test]
fn record_visit_appends_event_and_session() {
    let pool = test_pool();

    record_visit(&pool, "portfolio", None, Some("v1"), Some("s1"), Some("1.2.3.4"), Some("TestAgent"));
    record_visit(&pool, "projects", None, Some("v1"), Some("s1"), None, None);

    assert_eq!(VisitEvent::count(&pool), 2);

    let session = VisitorSession::find(&pool, "s1").unwrap();
    assert_eq!(session.page_views, 2);
    assert_eq!(session.last_page, "projects");
    assert_eq!(session.visitor_id, "v1");
    assert!(session.end_time.is_some());

    // Invariant: session counter matches the raw event count.
    assert_eq!(session.page_views, VisitEvent::count_for_session(&pool, "s1"));
}

#[test]
fn record_visit_first_event_has_no_end_time() {
    let pool = test_pool();
    record_visit(&pool, "portfolio", None, Some("v1"), Some("solo"), None, None);

    let session = VisitorSession::find(&pool, "solo").unwrap();
    assert_eq!(session.page_views, 1);
    assert!(session.end_time.is_none());
}

#[test]
fn record_visit_defaults_missing_ids() {
    let pool = test_pool();
    record_visit(&pool, "portfolio", None, None, None, None, None);
    record_visit(&pool, "portfolio", None, Some(""), Some(""), None, None);

    assert_eq!(VisitEvent::count(&pool), 2);

    let summary = AnalyticsSummary::compute(&pool);
    assert_eq!(summary.unique_visitors, 1); // both fall back to "anonymous"

    // Each missing session id got its own throwaway session.
    assert_eq!(summary.recent_sessions.len(), 2);
}

#[test]
fn record_visit_bumps_project_views() {
    let pool = test_pool();
    let id = Project::create(&pool, &make_project_form("Viewed", true, 1)).unwrap();

    record_visit(&pool, "project", Some(id), Some("v1"), Some("s1"), None, None);
    record_visit(&pool, "project", Some(id), Some("v2"), Some("s2"), None, None);

    assert_eq!(Project::find_by_id(&pool, id).unwrap().view_count, 2);
}

#[test]
fn record_visit_tolerates_unknown_project() {
    let pool = test_pool();
    // No such project: the event still lands, nothing panics.
    record_visit(&pool, "project", Some(424242), Some("v1"), Some("s1"), None, None);
    assert_eq!(VisitEvent::count(&pool), 1);
}

// ═══════════════════════════════════════════════════════════
// Analytics aggregation
// ═══════════════════════════════════════════════════════════

#[test]
fn summary_totals_and_uniques() {
    let pool = test_pool();
    record_visit(&pool, "portfolio", None, Some("v1"), Some("s1"), None, None);
    record_visit(&pool, "portfolio", None, Some("v1"), Some("s1"), None, None);
    record_visit(&pool, "about", None, Some("v2"), Some("s2"), None, None);

    let summary = AnalyticsSummary::compute(&pool);
    assert_eq!(summary.total_visits, 3);
    assert_eq!(summary.unique_visitors, 2);
    assert!(summary.total_visits >= 2);
}

#[test]
fn summary_page_views_descending() {
    let pool = test_pool();
    for _ in 0..3 {
        record_visit(&pool, "portfolio", None, Some("v1"), Some("s1"), None, None);
    }
    record_visit(&pool, "about", None, Some("v1"), Some("s1"), None, None);

    let summary = AnalyticsSummary::compute(&pool);
    assert_eq!(summary.page_views[0].page, "portfolio");
    assert_eq!(summary.page_views[0].views, 3);
    assert_eq!(summary.page_views[1].page, "about");
}

#[test]
fn summary_daily_visits_window_boundary() {
    let pool = test_pool();
    record_visit(&pool, "recent", None, Some("v1"), Some("s1"), None, None);
    record_visit(&pool, "old", None, Some("v1"), Some("s1"), None, None);
    record_visit(&pool, "ancient", None, Some("v1"), Some("s1"), None, None);

    let now = Utc::now().naive_utc();
    let just_inside = now - Duration::days(30) + Duration::seconds(1);
    let outside = now - Duration::days(31);
    {
        let conn = pool.get().unwrap();
        conn.execute(
            "UPDATE visit_events SET created_at = ?1 WHERE page = 'old'",
            params![just_inside],
        )
        .unwrap();
        conn.execute(
            "UPDATE visit_events SET created_at = ?1 WHERE page = 'ancient'",
            params![outside],
        )
        .unwrap();
    }

    let summary = AnalyticsSummary::compute(&pool);
    let daily_total: i64 = summary.daily_visits.iter().map(|d| d.visits).sum();
    assert_eq!(daily_total, 2); // today's event + the 30d-minus-1s one

    // Raw totals still count everything, window or not.
    assert_eq!(summary.total_visits, 3);
}

#[test]
fn summary_recent_sessions_capped_and_ordered() {
    let pool = test_pool();
    for i in 0..25 {
        record_visit(&pool, "portfolio", None, Some("v1"), Some(&format!("s{}", i)), None, None);
    }
    // Spread start times so the ordering is deterministic.
    {
        let conn = pool.get().unwrap();
        let base = Utc::now().naive_utc() - Duration::days(1);
        for i in 0..25 {
            conn.execute(
                "UPDATE visit_sessions SET start_time = ?1 WHERE session_id = ?2",
                params![base + Duration::minutes(i), format!("s{}", i)],
            )
            .unwrap();
        }
    }

    let summary = AnalyticsSummary::compute(&pool);
    assert_eq!(summary.recent_sessions.len(), 20);
    assert_eq!(summary.recent_sessions[0].session_id, "s24");
    assert!(summary
        .recent_sessions
        .windows(2)
        .all(|w| w[0].start_time >= w[1].start_time));
}

#[test]
fn summary_recent_visitors_activity() {
    let pool = test_pool();
    record_visit(&pool, "portfolio", None, Some("early"), Some("s1"), None, None);
    record_visit(&pool, "portfolio", None, Some("late"), Some("s2"), None, None);
    record_visit(&pool, "about", None, Some("late"), Some("s2"), None, None);

    // Backdate the first visitor's only event.
    {
        let conn = pool.get().unwrap();
        let yesterday = Utc::now().naive_utc() - Duration::days(1);
        conn.execute(
            "UPDATE visit_events SET created_at = ?1 WHERE visitor_id = 'early'",
            params![yesterday],
        )
        .unwrap();
    }

    let summary = AnalyticsSummary::compute(&pool);
    assert_eq!(summary.recent_visitors.len(), 2);
    assert_eq!(summary.recent_visitors[0].visitor_id, "late");
    assert_eq!(summary.recent_visitors[0].total_visits, 2);
    assert!(summary.recent_visitors[0].first_visit <= summary.recent_visitors[0].last_visit);
    assert_eq!(summary.recent_visitors[1].visitor_id, "early");
}

#[test]
fn summary_project_views_projection() {
    let pool = test_pool();
    let id = Project::create(&pool, &make_project_form("Popular", true, 1)).unwrap();
    record_visit(&pool, "project", Some(id), Some("v1"), Some("s1"), None, None);

    let summary = AnalyticsSummary::compute(&pool);
    assert_eq!(summary.project_views[0].id, id);
    assert_eq!(summary.project_views[0].title, "Popular");
    assert_eq!(summary.project_views[0].view_count, 1);
}

// ═══════════════════════════════════════════════════════════
// Concurrency
// ═══════════════════════════════════════════════════════════

#[test]
fn concurrent_view_count_increments_are_lossless() {
    let (_dir, pool) = disk_pool(8);
    let id = Project::create(&pool, &make_project_form("Contended", true, 1)).unwrap();

    const THREADS: usize = 10;
    const PER_THREAD: usize = 6;

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let pool = pool.clone();
            std::thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    Project::increment_view_count(&pool, id).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(
        Project::find_by_id(&pool, id).unwrap().view_count,
        (THREADS * PER_THREAD) as i64
    );
}

#[test]
fn concurrent_session_upserts_are_lossless() {
    let (_dir, pool) = disk_pool(8);

    const THREADS: usize = 10;
    const PER_THREAD: usize = 6;

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let pool = pool.clone();
            std::thread::spawn(move || {
                for i in 0..PER_THREAD {
                    record_visit(
                        &pool,
                        &format!("page-{}-{}", t, i),
                        None,
                        Some("v1"),
                        Some("shared-session"),
                        None,
                        None,
                    );
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let expected = (THREADS * PER_THREAD) as i64;
    let session = VisitorSession::find(&pool, "shared-session").unwrap();
    assert_eq!(session.page_views, expected);
    assert_eq!(VisitEvent::count_for_session(&pool, "shared-session"), expected);
}

// ═══════════════════════════════════════════════════════════
// Auth
// ═══════════════════════════════════════════════════════════

#[test]
fn password_hash_and_verify() {
    let hash = fast_hash("my_secure_password");
    assert!(auth::verify_password("my_secure_password", &hash));
    assert!(!auth::verify_password("wrong_password", &hash));
}

#[test]
fn admin_lookup() {
    let pool = test_pool();
    let admin = Admin::find_by_email(&pool, "admin@portfolio.com").unwrap();
    assert!(auth::verify_password("admin123", &admin.password_hash));
    assert_eq!(Admin::count(&pool), 1);

    let json = admin.safe_json();
    assert!(json.get("password_hash").is_none());
    assert_eq!(json["email"], "admin@portfolio.com");
}

#[test]
fn admin_unique_email() {
    let pool = test_pool();
    let result = Admin::create(&pool, "admin@portfolio.com", &fast_hash("pw"));
    assert!(result.is_err());
}

#[test]
fn session_create_validate_destroy() {
    let pool = test_pool();
    let admin = Admin::find_by_email(&pool, "admin@portfolio.com").unwrap();

    let sid = auth::create_session(&pool, admin.id, Some("1.2.3.4"), Some("TestAgent")).unwrap();
    assert!(auth::validate_session(&pool, &sid));
    assert_eq!(auth::get_session_admin(&pool, &sid).unwrap().id, admin.id);

    assert!(!auth::validate_session(&pool, "nonexistent"));

    auth::destroy_session(&pool, &sid).unwrap();
    assert!(!auth::validate_session(&pool, &sid));
}

#[test]
fn session_cleanup_expired() {
    let pool = test_pool();
    let admin = Admin::find_by_email(&pool, "admin@portfolio.com").unwrap();
    let sid = auth::create_session(&pool, admin.id, None, None).unwrap();

    // Manually insert an expired session
    {
        let conn = pool.get().unwrap();
        let now = Utc::now().naive_utc();
        conn.execute(
            "INSERT INTO admin_sessions (id, admin_id, created_at, expires_at) VALUES ('expired-sess', ?1, ?2, ?3)",
            params![admin.id, now - Duration::days(2), now - Duration::days(1)],
        )
        .unwrap();
    }

    assert!(!auth::validate_session(&pool, "expired-sess"));

    auth::cleanup_expired_sessions(&pool).unwrap();
    assert!(auth::validate_session(&pool, &sid));
    {
        let conn = pool.get().unwrap();
        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM admin_sessions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 1);
    }
}

#[test]
fn ip_hashing() {
    let h1 = auth::hash_ip("192.168.1.1");
    let h2 = auth::hash_ip("192.168.1.1");
    let h3 = auth::hash_ip("10.0.0.1");
    assert_eq!(h1, h2); // deterministic
    assert_ne!(h1, h3); // different IPs
    assert_eq!(h1.len(), 64); // SHA-256 hex
}

// ═══════════════════════════════════════════════════════════
// Rate limiter
// ═══════════════════════════════════════════════════════════

#[test]
fn rate_limiter_enforces_budget() {
    let limiter = RateLimiter::new();
    let window = std::time::Duration::from_secs(60);

    for _ in 0..5 {
        assert!(limiter.check_and_record("login:abc", 5, window));
    }
    assert!(!limiter.check_and_record("login:abc", 5, window));

    // Separate keys have separate budgets.
    assert!(limiter.check_and_record("login:def", 5, window));
}

#[test]
fn rate_limiter_cleanup_drops_stale_keys() {
    let limiter = RateLimiter::new();
    let window = std::time::Duration::from_secs(60);
    limiter.check_and_record("track:xyz", 5, window);

    limiter.cleanup(std::time::Duration::from_secs(0));
    // Budget is fresh again after cleanup pruned the old attempts.
    for _ in 0..5 {
        assert!(limiter.check_and_record("track:xyz", 5, window));
    }
}
