use rocket::http::{CookieJar, Status};
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, ClientIp};
use crate::db::DbPool;
use crate::models::admin::Admin;
use crate::models::settings::Setting;
use crate::rate_limit::RateLimiter;
use crate::routes::api::UserAgent;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[post("/login", format = "json", data = "<form>")]
pub fn login(
    form: Json<LoginForm>,
    pool: &State<DbPool>,
    limiter: &State<RateLimiter>,
    cookies: &CookieJar<'_>,
    client_ip: ClientIp,
    user_agent: UserAgent,
) -> (Status, Json<Value>) {
    if form.email.trim().is_empty() || form.password.is_empty() {
        return (
            Status::BadRequest,
            Json(json!({"success": false, "error": "Email and password are required"})),
        );
    }

    // Keyed by email so a caller behind a rotating IP still runs into
    // the same budget for one account.
    let rate_key = format!("login:{}", auth::hash_ip(&form.email));
    let max_attempts = Setting::get_i64(pool, "login_rate_limit").max(1) as u64;
    let window = std::time::Duration::from_secs(15 * 60);

    if !limiter.check_and_record(&rate_key, max_attempts, window) {
        return (
            Status::TooManyRequests,
            Json(json!({"success": false, "error": "Too many login attempts. Try again later."})),
        );
    }

    let admin = match Admin::find_by_email(pool, form.email.trim()) {
        Some(a) => a,
        None => {
            return (
                Status::Unauthorized,
                Json(json!({"success": false, "error": "Invalid credentials"})),
            )
        }
    };

    if !auth::verify_password(&form.password, &admin.password_hash) {
        return (
            Status::Unauthorized,
            Json(json!({"success": false, "error": "Invalid credentials"})),
        );
    }

    match auth::create_session(pool, admin.id, client_ip.0.as_deref(), user_agent.0.as_deref()) {
        Ok(session_id) => {
            auth::set_session_cookie(cookies, &session_id);
            (
                Status::Ok,
                Json(json!({"success": true, "admin": admin.safe_json()})),
            )
        }
        Err(e) => {
            log::error!("session creation failed: {}", e);
            (
                Status::InternalServerError,
                Json(json!({"success": false, "error": "Session creation failed"})),
            )
        }
    }
}

#[post("/logout")]
pub fn logout(pool: &State<DbPool>, cookies: &CookieJar<'_>) -> Json<Value> {
    if let Some(session_id) = auth::session_cookie(cookies) {
        let _ = auth::destroy_session(pool, &session_id);
    }
    auth::clear_session_cookie(cookies);
    Json(json!({"success": true}))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![login, logout]
}
