use crate::models::Preview;
use image::{imageops::FilterType, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::Path;

/// Error type for preview rendering
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("Image load error: {0}")]
    ImageLoadError(String),
    #[error("Image save error: {0}")]
    ImageSaveError(String),
    #[error("Task join error: {0}")]
    Join(String),
}

/// MIME type detected from the image header
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}

/// MIME type from the file extension, defaulting to JPEG
pub fn guess_mime_from_ext(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("heic") | Some("heif") => "image/heic",
        _ => "image/jpeg",
    }
}

/// Renders a WebP preview no larger than `max_size` on either side.
/// Smaller images keep their dimensions.
pub fn render_preview(bytes: &[u8], max_size: u32) -> Result<Preview, PreviewError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| PreviewError::ImageLoadError(format!("Failed to load image: {}", e)))?;

    let (width, height) = img.dimensions();
    let img = if width > max_size || height > max_size {
        img.resize(max_size, max_size, FilterType::Lanczos3)
    } else {
        img
    };
    // the WebP encoder only takes 8-bit RGB(A)
    let img = image::DynamicImage::ImageRgba8(img.to_rgba8());

    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::WebP)
        .map_err(|e| PreviewError::ImageSaveError(format!("Failed to write preview: {}", e)))?;

    log::debug!(
        "Preview rendered {}x{} -> {}x{}",
        width,
        height,
        img.width(),
        img.height()
    );

    Ok(Preview {
        bytes: buffer.into_inner(),
        mime_type: "image/webp".to_string(),
        width: img.width(),
        height: img.height(),
    })
}

/// [`render_preview`] on the blocking pool
pub async fn render_preview_blocking(
    bytes: Vec<u8>,
    max_size: u32,
) -> Result<Preview, PreviewError> {
    tokio::task::spawn_blocking(move || render_preview(&bytes, max_size))
        .await
        .map_err(|e| PreviewError::Join(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 40, 90]));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_large_image_is_downscaled() {
        let preview = render_preview(&png(400, 200), 100).unwrap();
        assert_eq!(preview.width, 100);
        assert_eq!(preview.height, 50);
        assert_eq!(preview.mime_type, "image/webp");
        assert_eq!(sniff_mime(&preview.bytes), Some("image/webp"));
    }

    #[test]
    fn test_small_image_keeps_size() {
        let preview = render_preview(&png(40, 30), 100).unwrap();
        assert_eq!((preview.width, preview.height), (40, 30));
    }

    #[test]
    fn test_gif_is_accepted() {
        let img = RgbImage::from_pixel(3, 2, Rgb([0, 0, 0]));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Gif).unwrap();
        let gif = buffer.into_inner();

        assert_eq!(sniff_mime(&gif), Some("image/gif"));
        let preview = render_preview(&gif, 100).unwrap();
        assert_eq!((preview.width, preview.height), (3, 2));
        assert_eq!(preview.mime_type, "image/webp");
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            render_preview(b"not an image", 100),
            Err(PreviewError::ImageLoadError(_))
        ));
    }

    #[test]
    fn test_sniff_and_guess_mime() {
        assert_eq!(sniff_mime(&png(2, 2)), Some("image/png"));
        assert_eq!(sniff_mime(b"plain text"), None);
        assert_eq!(guess_mime_from_ext(Path::new("a/b.PNG")), "image/png");
        assert_eq!(guess_mime_from_ext(Path::new("a/b")), "image/jpeg");
    }

    #[tokio::test]
    async fn test_blocking_render() {
        let preview = render_preview_blocking(png(300, 300), 64).await.unwrap();
        assert_eq!((preview.width, preview.height), (64, 64));
    }
}
