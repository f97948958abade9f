use log::error;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::analytics;
use crate::auth::{self, ClientIp};
use crate::db::DbPool;
use crate::models::settings::Setting;
use crate::portfolio::PortfolioData;
use crate::rate_limit::RateLimiter;

/// Sliding window for the per-IP tracking budget.
const TRACK_WINDOW_SECS: u64 = 60;

/// Raw User-Agent header, if the client sent one.
pub struct UserAgent(pub Option<String>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for UserAgent {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        Outcome::Success(UserAgent(
            request.headers().get_one("User-Agent").map(String::from),
        ))
    }
}

// ── Public portfolio read ──────────────────────────────

#[get("/portfolio")]
pub fn portfolio_public(pool: &State<DbPool>) -> Result<Json<Value>, Status> {
    match PortfolioData::fetch(pool, false) {
        Ok(data) => Ok(Json(serde_json::to_value(data).unwrap_or_default())),
        Err(e) => {
            error!("portfolio read failed: {}", e);
            Err(Status::InternalServerError)
        }
    }
}

// ── Visit tracking ─────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackForm {
    pub page: String,
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub visitor_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Tracking always answers success: analytics must never break the
/// page that fired it. Client ids are untrusted input, so a per-IP
/// budget caps how fast one caller can pump events in.
#[post("/track", format = "json", data = "<form>")]
pub fn track(
    pool: &State<DbPool>,
    limiter: &State<RateLimiter>,
    form: Json<TrackForm>,
    client_ip: ClientIp,
    user_agent: UserAgent,
) -> Json<Value> {
    let rate_id = client_ip.0.as_deref().unwrap_or("unknown");
    let rate_key = format!("track:{}", auth::hash_ip(rate_id));
    let max_events = Setting::get_i64(pool, "track_rate_limit").max(1) as u64;
    let window = std::time::Duration::from_secs(TRACK_WINDOW_SECS);

    if limiter.check_and_record(&rate_key, max_events, window) {
        analytics::record_visit(
            pool,
            &form.page,
            form.project_id,
            form.visitor_id.as_deref(),
            form.session_id.as_deref(),
            client_ip.0.as_deref(),
            user_agent.0.as_deref(),
        );
    }

    Json(json!({"success": true}))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![portfolio_public, track]
}
