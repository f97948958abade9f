use log::error;
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};

use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::models::analytics::AnalyticsSummary;
use crate::portfolio::{self, PortfolioData, SaveError};
use crate::uploads;

// ── Content ────────────────────────────────────────────

/// Same read-model as the public endpoint, drafts included.
#[get("/portfolio")]
pub fn portfolio_full(_admin: AdminUser, pool: &State<DbPool>) -> Result<Json<Value>, Status> {
    match PortfolioData::fetch(pool, true) {
        Ok(data) => Ok(Json(serde_json::to_value(data).unwrap_or_default())),
        Err(e) => {
            error!("admin portfolio read failed: {}", e);
            Err(Status::InternalServerError)
        }
    }
}

/// Tagged save: `{"type": "profile"|"stats"|"about"|"projects", "data": …}`.
/// The caller gets a coarse success/failure; causes go to the log.
#[put("/portfolio", format = "json", data = "<payload>")]
pub fn portfolio_save(
    _admin: AdminUser,
    pool: &State<DbPool>,
    payload: Json<Value>,
) -> (Status, Json<Value>) {
    match portfolio::save(pool, payload.into_inner()) {
        Ok(()) => (Status::Ok, Json(json!({"success": true}))),
        Err(e) => {
            error!("portfolio save failed: {}", e);
            (save_error_status(&e), Json(json!({"success": false, "error": "Save failed"})))
        }
    }
}

#[delete("/portfolio/projects/<id>")]
pub fn project_delete(
    _admin: AdminUser,
    pool: &State<DbPool>,
    id: i64,
) -> (Status, Json<Value>) {
    match portfolio::delete_project(pool, id) {
        Ok(()) => (Status::Ok, Json(json!({"success": true}))),
        Err(e) => {
            error!("project delete failed: {}", e);
            (save_error_status(&e), Json(json!({"success": false, "error": "Delete failed"})))
        }
    }
}

fn save_error_status(e: &SaveError) -> Status {
    match e {
        SaveError::Validation(_) => Status::BadRequest,
        SaveError::NotFound(_) => Status::NotFound,
        SaveError::Storage(_) => Status::InternalServerError,
    }
}

// ── Analytics ──────────────────────────────────────────

#[get("/analytics")]
pub fn analytics_summary(_admin: AdminUser, pool: &State<DbPool>) -> Json<Value> {
    let summary = AnalyticsSummary::compute(pool);
    Json(serde_json::to_value(summary).unwrap_or_default())
}

// ── Uploads ────────────────────────────────────────────

#[derive(FromForm)]
pub struct UploadForm<'f> {
    pub file: TempFile<'f>,
}

#[post("/upload", data = "<form>")]
pub async fn upload(
    _admin: AdminUser,
    pool: &State<DbPool>,
    mut form: Form<UploadForm<'_>>,
) -> (Status, Json<Value>) {
    match uploads::save_upload(&mut form.file, pool).await {
        Some(url) => (Status::Ok, Json(json!({"success": true, "url": url}))),
        None => (
            Status::InternalServerError,
            Json(json!({"success": false, "error": "Upload failed"})),
        ),
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        portfolio_full,
        portfolio_save,
        project_delete,
        analytics_summary,
        upload
    ]
}
