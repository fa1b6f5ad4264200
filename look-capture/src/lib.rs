//! # Look Capture
//!
//! Photo intake for the try-on studio.
//!
//! This crate provides:
//! - A [`CameraDevice`] abstraction and a scoped [`CameraSession`] that releases
//!   the device exactly once on every exit path
//! - A file-backed camera for desktop and scripted use
//! - Preview rendering (downscaled WebP plus data URL) for uploaded garments
//! - MIME detection from image bytes
//!
//! ## Platform Separation
//!
//! Live camera drivers belong to the application shell. Anything that can
//! hand back encoded photos can implement [`CameraDevice`].
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use look_capture::{CameraSession, Facing, FileCamera};
//!
//! let mut camera = FileCamera::new(vec!["me.jpg".into(), "shirt.jpg".into()]);
//! let mut session = CameraSession::acquire(&mut camera, Facing::User).await?;
//! let person = session.capture(Facing::User).await?;
//! let garment = session.capture(Facing::Environment).await?;
//! session.release();
//! ```

pub mod camera;
pub mod models;
pub mod preview;

pub use camera::{CameraDevice, CameraSession, CaptureError, FileCamera};
pub use models::{CapturedPhoto, Facing, Preview};
pub use preview::{
    guess_mime_from_ext, render_preview, render_preview_blocking, sniff_mime, PreviewError,
};
