use crate::error::AppError;
use crate::models::EncodedImage;
use chrono::{DateTime, Utc};
use look_capture::{guess_mime_from_ext, sniff_mime};
use std::path::{Path, PathBuf};

/// Reads an image file. The MIME type comes from the bytes, then the extension.
pub fn read_image_file(path: &Path) -> Result<EncodedImage, AppError> {
    let bytes = std::fs::read(path).map_err(|e| {
        AppError::ImageProcessing(format!("Failed to read {}: {}", path.display(), e))
    })?;
    if bytes.is_empty() {
        return Err(AppError::ImageProcessing(format!(
            "{} is empty",
            path.display()
        )));
    }
    let mime = sniff_mime(&bytes).unwrap_or_else(|| guess_mime_from_ext(path));
    log::debug!("Read {} ({} bytes, {})", path.display(), bytes.len(), mime);
    Ok(EncodedImage::new(bytes, mime))
}

pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime.split(';').next().unwrap_or_default().trim() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        _ => "bin",
    }
}

/// Output file name, e.g. `look_20260101_120000.png`
pub fn output_file_name(prefix: &str, at: DateTime<Utc>, mime: &str) -> String {
    format!(
        "{}_{}.{}",
        prefix,
        at.format("%Y%m%d_%H%M%S"),
        extension_for_mime(mime)
    )
}

/// Writes generated media into `dir`, creating it if needed
pub fn write_output(
    dir: &Path,
    prefix: &str,
    at: DateTime<Utc>,
    bytes: &[u8],
    mime: &str,
) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(output_file_name(prefix, at, mime));
    std::fs::write(&path, bytes)?;
    log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}
