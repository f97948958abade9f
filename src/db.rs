use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub type DbPool = Pool<SqliteConnectionManager>;

pub fn init_pool() -> Result<DbPool, Box<dyn std::error::Error>> {
    let manager = SqliteConnectionManager::file("data/db/folio.db");
    let pool = Pool::builder().max_size(10).build(manager)?;

    // Enable WAL mode for better concurrent read performance
    let conn = pool.get()?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    conn.execute_batch(
        "
        -- Profile (singleton, fixed rowid)
        CREATE TABLE IF NOT EXISTS profile (
            id INTEGER PRIMARY KEY,
            greeting TEXT NOT NULL DEFAULT '',
            name TEXT NOT NULL DEFAULT '',
            title TEXT NOT NULL DEFAULT '',
            bio TEXT NOT NULL DEFAULT '',
            skills TEXT NOT NULL DEFAULT '[]',
            profile_image TEXT NOT NULL DEFAULT '',
            resume_url TEXT NOT NULL DEFAULT '',
            linkedin_url TEXT NOT NULL DEFAULT '',
            github_url TEXT NOT NULL DEFAULT '',
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Home-page stat tiles, bulk-replaced on every save
        CREATE TABLE IF NOT EXISTS stats (
            id INTEGER PRIMARY KEY,
            number TEXT NOT NULL,
            label TEXT NOT NULL,
            icon TEXT NOT NULL DEFAULT '',
            background TEXT NOT NULL DEFAULT '',
            sort_order INTEGER NOT NULL DEFAULT 0
        );

        -- About section (singleton, fixed rowid)
        CREATE TABLE IF NOT EXISTS about (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL DEFAULT '',
            tools TEXT NOT NULL DEFAULT '[]',
            expertise TEXT NOT NULL DEFAULT '[]',
            conclusion TEXT NOT NULL DEFAULT '',
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Projects
        CREATE TABLE IF NOT EXISTS projects (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            domain TEXT NOT NULL DEFAULT '',
            badge TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            details TEXT NOT NULL DEFAULT '',
            card_gradient TEXT NOT NULL DEFAULT '',
            card_label TEXT NOT NULL DEFAULT '',
            youtube_id TEXT,
            github_url TEXT,
            images TEXT NOT NULL DEFAULT '[]',
            published INTEGER NOT NULL DEFAULT 1,
            view_count INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Visit events (append-only)
        CREATE TABLE IF NOT EXISTS visit_events (
            id INTEGER PRIMARY KEY,
            visitor_id TEXT NOT NULL,
            session_id TEXT NOT NULL,
            page TEXT NOT NULL,
            project_id INTEGER,
            ip_address TEXT,
            user_agent TEXT,
            created_at DATETIME NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_events_date ON visit_events(created_at);
        CREATE INDEX IF NOT EXISTS idx_events_page ON visit_events(page);
        CREATE INDEX IF NOT EXISTS idx_events_visitor ON visit_events(visitor_id);
        CREATE INDEX IF NOT EXISTS idx_events_session ON visit_events(session_id);

        -- Rolling per-session summary
        CREATE TABLE IF NOT EXISTS visit_sessions (
            session_id TEXT PRIMARY KEY,
            visitor_id TEXT NOT NULL,
            page_views INTEGER NOT NULL DEFAULT 1,
            last_page TEXT NOT NULL DEFAULT '',
            start_time DATETIME NOT NULL,
            end_time DATETIME
        );

        -- Admin accounts
        CREATE TABLE IF NOT EXISTS admins (
            id INTEGER PRIMARY KEY,
            email TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Admin sessions
        CREATE TABLE IF NOT EXISTS admin_sessions (
            id TEXT PRIMARY KEY,
            admin_id INTEGER NOT NULL,
            created_at DATETIME NOT NULL,
            expires_at DATETIME NOT NULL,
            ip_address TEXT,
            user_agent TEXT,
            FOREIGN KEY (admin_id) REFERENCES admins(id)
        );

        -- Settings (key-value)
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT
        );
        ",
    )?;

    Ok(())
}

pub fn seed_defaults(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    let defaults = vec![
        ("site_name", "Portfolio"),
        ("site_url", "http://localhost:8000"),
        // Security
        ("session_expiry_hours", "168"),
        ("login_rate_limit", "5"),
        ("track_rate_limit", "120"),
        // Uploads
        ("uploads_storage_path", "data/uploads/"),
        ("uploads_max_upload_mb", "10"),
    ];

    for (key, value) in defaults {
        conn.execute(
            "INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
    }

    // Seed the admin account if none exists. Credentials come from the
    // environment; the fallbacks MUST be changed for production.
    let admin_count: i64 = conn.query_row("SELECT COUNT(*) FROM admins", [], |row| row.get(0))?;

    if admin_count == 0 {
        let email =
            std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@portfolio.com".to_string());
        let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
        let hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)?;
        conn.execute(
            "INSERT INTO admins (email, password_hash) VALUES (?1, ?2)",
            params![email, hash],
        )?;
    }

    Ok(())
}
