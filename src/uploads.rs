//! Blob storage collaborator: persist an uploaded file and hand back
//! an opaque URL. Callers store the URL verbatim on profile and
//! project image fields; nothing here inspects image contents.

use log::warn;
use rocket::fs::TempFile;

use crate::db::DbPool;
use crate::models::settings::Setting;

/// Persist `file` under the uploads directory with a uuid name and
/// return its public URL, or None when the file is oversized or the
/// write fails.
pub async fn save_upload(file: &mut TempFile<'_>, pool: &DbPool) -> Option<String> {
    let max_mb = Setting::get_i64(pool, "uploads_max_upload_mb").max(1) as u64;
    if file.len() > max_mb * 1024 * 1024 {
        warn!("upload rejected: {} bytes exceeds {} MB cap", file.len(), max_mb);
        return None;
    }

    // Content-type extension first, then the original filename.
    let ext = file
        .content_type()
        .and_then(|ct| ct.extension())
        .map(|e| e.to_string())
        .or_else(|| {
            file.raw_name().and_then(|rn| {
                let s = rn.dangerous_unsafe_unsanitized_raw().as_str().to_string();
                s.rsplit('.').next().map(|e| e.to_lowercase())
            })
        })
        .unwrap_or_else(|| "bin".to_string());

    let filename = format!("media_{}.{}", uuid::Uuid::new_v4(), ext);
    let upload_dir = Setting::get_or(pool, "uploads_storage_path", "data/uploads/");
    let upload_dir = std::path::Path::new(&upload_dir);
    let _ = std::fs::create_dir_all(upload_dir);
    let dest = upload_dir.join(&filename);

    if let Err(e) = file.persist_to(&dest).await {
        warn!("upload write to {} failed: {}", dest.display(), e);
        return None;
    }

    Some(format!("/uploads/{}", filename))
}
