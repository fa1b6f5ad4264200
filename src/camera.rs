// Thin wrapper around look-capture for the lightning flow

use crate::error::AppError;
use std::path::PathBuf;

use look_capture::FileCamera;

/// Camera that replays a person shot and then a garment shot from disk
pub fn file_camera(person: PathBuf, garment: PathBuf) -> Result<FileCamera, AppError> {
    for path in [&person, &garment] {
        if !path.is_file() {
            return Err(AppError::Camera(look_capture::CaptureError::Other(format!(
                "{} is not a file",
                path.display()
            ))));
        }
    }
    Ok(FileCamera::new([person, garment]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_camera_requires_files() {
        let dir = tempfile::tempdir().unwrap();
        let person = dir.path().join("person.jpg");
        std::fs::write(&person, b"x").unwrap();

        assert!(file_camera(person.clone(), dir.path().join("missing.jpg")).is_err());

        let garment = dir.path().join("garment.jpg");
        std::fs::write(&garment, b"y").unwrap();
        let camera = file_camera(person, garment).unwrap();
        assert_eq!(camera.remaining(), 2);
    }
}
