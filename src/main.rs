#[macro_use]
extern crate rocket;

use rocket::fs::FileServer;
use rocket::serde::json::Json;
use serde_json::{json, Value};

mod analytics;
mod auth;
mod boot;
mod db;
mod portfolio;
mod rate_limit;
mod seed;
mod uploads;

mod models;
mod routes;

#[cfg(test)]
mod tests;

use rate_limit::RateLimiter;

#[catch(400)]
fn bad_request() -> Json<Value> {
    Json(json!({"success": false, "error": "Bad request"}))
}

#[catch(401)]
fn unauthorized() -> Json<Value> {
    Json(json!({"success": false, "error": "Unauthorized"}))
}

#[catch(404)]
fn not_found() -> Json<Value> {
    Json(json!({"success": false, "error": "Not found"}))
}

#[catch(422)]
fn unprocessable() -> Json<Value> {
    Json(json!({"success": false, "error": "Malformed request body"}))
}

#[catch(500)]
fn server_error() -> Json<Value> {
    Json(json!({"success": false, "error": "Internal server error"}))
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    // Boot check: verify/create data directories before touching the DB
    boot::run();

    let pool = db::init_pool().expect("Failed to initialize database pool");
    db::run_migrations(&pool).expect("Failed to run database migrations");
    db::seed_defaults(&pool).expect("Failed to seed default settings");

    // Stale admin sessions accumulate between restarts; purge them now.
    if let Err(e) = auth::cleanup_expired_sessions(&pool) {
        log::warn!("session cleanup failed: {}", e);
    }

    rocket::build()
        .manage(pool)
        .manage(RateLimiter::new())
        .mount("/uploads", FileServer::from("data/uploads"))
        .mount("/api", routes::api::routes())
        .mount("/api/admin", routes::admin::routes())
        .mount("/api/auth", routes::auth::routes())
        .register(
            "/",
            catchers![bad_request, unauthorized, not_found, unprocessable, server_error],
        )
}
