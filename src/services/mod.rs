pub mod generation_service;
pub mod identification_service;
pub mod lightning_service;
pub mod prompt_service;
pub mod studio_service;
pub mod video_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use studio_service::{LookStudio, StudioFailure};
