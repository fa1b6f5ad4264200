use crate::models::body_part::BodyPartCategory;
use chrono::{DateTime, Utc};
use look_capture::CapturedPhoto;
use std::path::PathBuf;
use uuid::Uuid;

/// Encoded image bytes with their MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl EncodedImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

/// The person the look is built on
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPhoto {
    pub image: EncodedImage,
    /// Local file the photo came from, if any
    pub path: Option<PathBuf>,
}

impl ModelPhoto {
    pub fn new(image: EncodedImage, path: Option<PathBuf>) -> Self {
        Self { image, path }
    }
}

impl From<CapturedPhoto> for ModelPhoto {
    fn from(photo: CapturedPhoto) -> Self {
        Self {
            image: EncodedImage::new(photo.bytes, photo.mime_type),
            path: photo.path,
        }
    }
}

/// A generated composite
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub id: Uuid,
    pub image: EncodedImage,
    pub generated_at: DateTime<Utc>,
}

impl GenerationResult {
    pub fn new(image: EncodedImage) -> Self {
        Self {
            id: Uuid::new_v4(),
            image,
            generated_at: Utc::now(),
        }
    }
}

/// A video rendered from exactly one composite
#[derive(Debug, Clone, PartialEq)]
pub struct VideoResult {
    /// Id of the [`GenerationResult`] the video was made from
    pub source: Uuid,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// What the classifier saw in a garment photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentificationResult {
    pub product_name: String,
    pub body_part: BodyPartCategory,
}
