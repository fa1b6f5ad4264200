// Camera capture for the lightning flow
//
// A device is opened once per flow through a CameraSession. The session hands
// the device back on release() or drop, whichever happens first, and never twice.

use crate::models::{CapturedPhoto, Facing};
use crate::preview::{guess_mime_from_ext, sniff_mime};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CaptureError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Cancelled: {0}")]
    Cancelled(String),
    #[error("Platform not supported: {0}")]
    PlatformNotSupported(String),
    #[error("Device busy: {0}")]
    Busy(String),
    #[error("Error: {0}")]
    Other(String),
}

/// A camera that can be opened, take pictures and be released
#[async_trait]
pub trait CameraDevice: Send {
    async fn open(&mut self, facing: Facing) -> Result<(), CaptureError>;

    /// Take one picture. User cancellation is reported as [`CaptureError::Cancelled`].
    async fn capture(&mut self, facing: Facing) -> Result<CapturedPhoto, CaptureError>;

    /// Stop the device. Called exactly once per successful `open`.
    fn release(&mut self);
}

/// Scoped ownership of an opened camera
pub struct CameraSession<'a> {
    device: &'a mut dyn CameraDevice,
    released: bool,
}

impl<'a> CameraSession<'a> {
    /// Opens the device. If opening fails nothing is held and nothing is released.
    pub async fn acquire(
        device: &'a mut dyn CameraDevice,
        facing: Facing,
    ) -> Result<CameraSession<'a>, CaptureError> {
        device.open(facing).await?;
        log::debug!("Camera acquired ({:?})", facing);
        Ok(Self {
            device,
            released: false,
        })
    }

    pub async fn capture(&mut self, facing: Facing) -> Result<CapturedPhoto, CaptureError> {
        if self.released {
            return Err(CaptureError::Other("camera already released".to_string()));
        }
        self.device.capture(facing).await
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if !self.released {
            self.released = true;
            self.device.release();
            log::debug!("Camera released");
        }
    }
}

impl Drop for CameraSession<'_> {
    fn drop(&mut self) {
        self.release_once();
    }
}

/// Camera that "captures" pre-recorded image files in order
#[derive(Debug, Default)]
pub struct FileCamera {
    shots: VecDeque<PathBuf>,
    open: bool,
    facing: Option<Facing>,
}

impl FileCamera {
    pub fn new(shots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            shots: shots.into_iter().collect(),
            open: false,
            facing: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn remaining(&self) -> usize {
        self.shots.len()
    }
}

#[async_trait]
impl CameraDevice for FileCamera {
    async fn open(&mut self, facing: Facing) -> Result<(), CaptureError> {
        if self.open {
            return Err(CaptureError::Busy("camera already in use".to_string()));
        }
        self.open = true;
        self.facing = Some(facing);
        Ok(())
    }

    async fn capture(&mut self, facing: Facing) -> Result<CapturedPhoto, CaptureError> {
        if !self.open {
            return Err(CaptureError::Other("camera is not open".to_string()));
        }
        if self.facing != Some(facing) {
            log::debug!("Switching camera to {:?}", facing);
            self.facing = Some(facing);
        }

        let path = self
            .shots
            .pop_front()
            .ok_or_else(|| CaptureError::Cancelled("no photo taken".to_string()))?;

        let bytes = std::fs::read(&path)
            .map_err(|e| CaptureError::Other(format!("Failed to read {}: {}", path.display(), e)))?;
        let mime = sniff_mime(&bytes).unwrap_or_else(|| guess_mime_from_ext(&path));

        Ok(CapturedPhoto::new(bytes, mime, Some(path)))
    }

    fn release(&mut self) {
        self.open = false;
        self.facing = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingCamera {
        opens: Arc<AtomicUsize>,
        releases: Arc<AtomicUsize>,
        fail_open: bool,
        fail_capture: bool,
    }

    #[async_trait]
    impl CameraDevice for CountingCamera {
        async fn open(&mut self, _facing: Facing) -> Result<(), CaptureError> {
            if self.fail_open {
                return Err(CaptureError::PermissionDenied("camera".to_string()));
            }
            self.opens.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn capture(&mut self, _facing: Facing) -> Result<CapturedPhoto, CaptureError> {
            if self.fail_capture {
                return Err(CaptureError::Cancelled("closed".to_string()));
            }
            Ok(CapturedPhoto::new(vec![1], "image/jpeg", None))
        }

        fn release(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_explicit_release_happens_once() {
        let mut camera = CountingCamera::default();
        let releases = camera.releases.clone();
        {
            let mut session = CameraSession::acquire(&mut camera, Facing::User).await.unwrap();
            session.capture(Facing::User).await.unwrap();
            session.release();
        }
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drop_releases_after_error() {
        let mut camera = CountingCamera {
            fail_capture: true,
            ..Default::default()
        };
        let releases = camera.releases.clone();

        async fn take(camera: &mut CountingCamera) -> Result<CapturedPhoto, CaptureError> {
            let mut session = CameraSession::acquire(camera, Facing::User).await?;
            let photo = session.capture(Facing::User).await;
            photo
        }

        assert!(take(&mut camera).await.is_err());
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_open_is_not_released() {
        let mut camera = CountingCamera {
            fail_open: true,
            ..Default::default()
        };
        let releases = camera.releases.clone();
        assert!(CameraSession::acquire(&mut camera, Facing::User).await.is_err());
        assert_eq!(releases.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_file_camera_reads_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("person.jpg");
        let second = dir.path().join("garment.png");
        std::fs::write(&first, b"first").unwrap();
        std::fs::write(&second, b"second").unwrap();

        let mut camera = FileCamera::new(vec![first.clone(), second.clone()]);
        {
            let mut session = CameraSession::acquire(&mut camera, Facing::User).await.unwrap();
            let a = session.capture(Facing::User).await.unwrap();
            let b = session.capture(Facing::Environment).await.unwrap();
            assert_eq!(a.bytes, b"first");
            assert_eq!(a.mime_type, "image/jpeg");
            assert_eq!(a.path.as_deref(), Some(first.as_path()));
            assert_eq!(b.mime_type, "image/png");

            let err = session.capture(Facing::Environment).await.unwrap_err();
            assert!(matches!(err, CaptureError::Cancelled(_)));
        }
        assert!(!camera.is_open());
    }

    #[tokio::test]
    async fn test_file_camera_is_single_owner() {
        let mut camera = FileCamera::new(Vec::new());
        camera.open(Facing::User).await.unwrap();
        assert!(matches!(
            camera.open(Facing::User).await,
            Err(CaptureError::Busy(_))
        ));
    }
}
