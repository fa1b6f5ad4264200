use base64::Engine;
use std::path::PathBuf;
use uuid::Uuid;

/// Which way the camera looks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Front camera, used for the person
    User,
    /// Rear camera, used for the garment
    Environment,
}

/// A photo taken by a camera device
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedPhoto {
    pub id: Uuid,
    pub bytes: Vec<u8>,
    pub mime_type: String,
    /// Local file backing the photo, if the device wrote one
    pub path: Option<PathBuf>,
}

impl CapturedPhoto {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            bytes,
            mime_type: mime_type.into(),
            path,
        }
    }
}

/// Downscaled rendition of an uploaded image
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

impl Preview {
    pub fn data_url(&self) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.mime_type, b64)
    }
}
