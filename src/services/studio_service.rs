use crate::config::StudioConfig;
use crate::error::{AppError, Operation, ValidationError};
use crate::models::{
    Activity, AdjustmentChange, BodyPartCategory, EncodedImage, GarmentSlot,
    GenerationResult, LookSession, ModelPhoto, VideoResult,
};
use crate::services::generation_service::ImageGenerationClient;
use crate::services::identification_service::IdentificationClient;
use crate::services::lightning_service::{LightningLook, LightningPipeline};
use crate::services::prompt_service::assemble;
use crate::services::video_service::{VideoPoller, VideoSettings};
use gemini_client::{CredentialGate, CredentialState, GenerativeBackend};
use look_capture::{render_preview_blocking, CameraDevice};
use std::fmt;
use std::sync::Arc;

/// A failed user action: the cause plus the one message to show for it
#[derive(Debug)]
pub struct StudioFailure {
    pub error: AppError,
    pub message: String,
}

impl fmt::Display for StudioFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// Failures outside a user operation (setup, output files) show the error itself
impl From<AppError> for StudioFailure {
    fn from(error: AppError) -> Self {
        StudioFailure {
            message: error.to_string(),
            error,
        }
    }
}

impl std::error::Error for StudioFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Orchestration boundary: owns the session and runs every user-facing operation
pub struct LookStudio {
    session: LookSession,
    generator: ImageGenerationClient,
    poller: VideoPoller,
    lightning: LightningPipeline,
    credentials: CredentialState,
    gate: Arc<dyn CredentialGate>,
    preview_size: u32,
}

impl LookStudio {
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        gate: Arc<dyn CredentialGate>,
        config: &StudioConfig,
    ) -> Self {
        let generator = ImageGenerationClient::new(backend.clone(), config.image_model.clone());
        let identifier = IdentificationClient::new(backend.clone(), config.identify_model.clone());
        Self {
            session: LookSession::new(),
            lightning: LightningPipeline::new(identifier, generator.clone()),
            generator,
            poller: VideoPoller::new(backend, VideoSettings::from_config(config)),
            credentials: CredentialState::new(),
            gate,
            preview_size: config.preview_size,
        }
    }

    pub fn session(&self) -> &LookSession {
        &self.session
    }

    pub fn credentials(&self) -> &CredentialState {
        &self.credentials
    }

    pub fn set_model_photo(&mut self, photo: ModelPhoto) {
        self.session.set_model_photo(photo);
    }

    /// Adds or replaces the garment for `category` and renders its preview
    pub async fn upload_garment(
        &mut self,
        category: BodyPartCategory,
        image: EncodedImage,
    ) -> Result<(), StudioFailure> {
        let preview = render_preview_blocking(image.bytes.clone(), self.preview_size)
            .await
            .map_err(|e| self.failure(e.into(), Operation::Upload))?;
        log::debug!(
            "Garment for {} uploaded, preview {}x{}",
            category,
            preview.width,
            preview.height
        );
        self.session
            .put_slot(GarmentSlot::new(category, image, preview));
        Ok(())
    }

    pub fn adjust(
        &mut self,
        category: BodyPartCategory,
        change: AdjustmentChange,
    ) -> Result<(), StudioFailure> {
        self.session
            .apply_change(category, change)
            .map_err(|e| self.failure(e.into(), Operation::ImageGeneration))
    }

    /// Renders the current look. The previous composite and video are gone
    /// whether or not this succeeds.
    pub async fn generate_look(&mut self) -> Result<GenerationResult, StudioFailure> {
        let op = Operation::ImageGeneration;
        let parts = assemble(self.session.model_photo(), self.session.slots())
            .map_err(|e| self.failure(e.into(), op))?;
        self.session
            .begin(Activity::Image)
            .map_err(|e| self.failure(e.into(), op))?;
        self.session.clear_results();

        let outcome = self.generator.generate_image(parts).await;
        self.session.end(Activity::Image);

        match outcome {
            Ok(image) => {
                let result = GenerationResult::new(image);
                self.session.store_generation(result.clone());
                log::info!("Look generated ({})", result.id);
                Ok(result)
            }
            Err(e) => Err(self.failure(e, op)),
        }
    }

    /// Turns the current composite into a runway video
    pub async fn generate_video(
        &mut self,
        on_progress: impl FnMut(&str),
    ) -> Result<VideoResult, StudioFailure> {
        let op = Operation::VideoGeneration;
        let composite = match self.session.generation().cloned() {
            Some(generation) => generation,
            None => return Err(self.failure(ValidationError::NoGeneratedImage.into(), op)),
        };
        self.session
            .begin(Activity::Video)
            .map_err(|e| self.failure(e.into(), op))?;

        if !self.credentials.check_and_prompt(self.gate.as_ref()).await {
            self.session.end(Activity::Video);
            return Err(self.failure(AppError::Credential("no API key selected".to_string()), op));
        }

        let outcome = self.poller.start(&composite).wait(on_progress).await;
        self.session.end(Activity::Video);

        let video = outcome.map_err(|e| self.failure(e, op))?;
        self.session
            .store_video(video.clone())
            .map_err(|e| self.failure(e.into(), op))?;
        Ok(video)
    }

    /// Capture, identify and generate in one go. The person becomes the model photo.
    pub async fn run_lightning(
        &mut self,
        camera: &mut dyn CameraDevice,
    ) -> Result<LightningLook, StudioFailure> {
        let op = Operation::Lightning;
        self.session
            .begin(Activity::Image)
            .map_err(|e| self.failure(e.into(), op))?;

        let outcome = self.lightning.run(camera).await;
        self.session.end(Activity::Image);

        let look = outcome.map_err(|e| self.failure(e, op))?;
        self.session.adopt_lightning(
            ModelPhoto::from(look.person.clone()),
            look.composite.clone(),
        );
        Ok(look)
    }

    fn failure(&mut self, error: AppError, operation: Operation) -> StudioFailure {
        if error.is_credential() {
            self.credentials.invalidate();
            self.gate.forget();
        }
        let message = error.user_message(operation);
        log::warn!("{:?} failed: {} ({})", operation, message, error);
        StudioFailure { error, message }
    }
}
