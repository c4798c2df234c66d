//! Naming rules for files in the uploads directory.

use std::path::Path;

/// Reduces `name` to its last path component.
///
/// Returns `None` when nothing usable is left: empty names, `.`/`..`,
/// hidden files and names containing control characters.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next()?.trim();
    if last.is_empty() || last.starts_with('.') || last.chars().any(char::is_control) {
        return None;
    }
    Some(last.to_string())
}

/// Name for an upload that came without an explicit `fileName`:
/// `<stem>-<millis>.<ext>` from the client's original name.
pub fn derive_upload_name(original: Option<&str>, now_millis: i64) -> String {
    let original = original.and_then(sanitize_file_name);
    let path = original.as_deref().map(Path::new);
    let stem = path
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let ext = path
        .and_then(|p| p.extension())
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| "jpg".to_string());
    format!("{stem}-{now_millis}.{ext}")
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// Content type served for a stored file, by extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
