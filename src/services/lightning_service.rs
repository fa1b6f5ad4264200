use crate::error::AppError;
use crate::i18n::{t, Phrase};
use crate::models::{
    AdjustmentSet, EncodedImage, GenerationResult, IdentificationResult,
};
use crate::services::generation_service::ImageGenerationClient;
use crate::services::identification_service::IdentificationClient;
use crate::services::prompt_service::describe_slot;
use gemini_client::Part;
use look_capture::{CameraDevice, CameraSession, CapturedPhoto, Facing};

/// Outcome of one lightning run
#[derive(Debug, Clone)]
pub struct LightningLook {
    /// Person as captured, still pointing at its local file if there is one
    pub person: CapturedPhoto,
    pub composite: GenerationResult,
    pub identification: IdentificationResult,
}

/// Identify-then-generate from two camera shots
#[derive(Clone)]
pub struct LightningPipeline {
    identifier: IdentificationClient,
    generator: ImageGenerationClient,
}

impl LightningPipeline {
    pub fn new(identifier: IdentificationClient, generator: ImageGenerationClient) -> Self {
        Self {
            identifier,
            generator,
        }
    }

    /// Person from the front camera, then the garment from the rear one.
    /// The camera is released on every path out of here.
    pub async fn capture_photos(
        camera: &mut dyn CameraDevice,
    ) -> Result<(CapturedPhoto, CapturedPhoto), AppError> {
        let mut session = CameraSession::acquire(camera, Facing::User).await?;
        let person = session.capture(Facing::User).await?;
        let garment = session.capture(Facing::Environment).await?;
        session.release();
        Ok((person, garment))
    }

    /// The two network stages. Identification failure stops the run.
    pub async fn process(
        &self,
        person: CapturedPhoto,
        garment: CapturedPhoto,
    ) -> Result<LightningLook, AppError> {
        let garment_image = EncodedImage::new(garment.bytes, garment.mime_type);
        let identification = self.identifier.identify(&garment_image).await?;

        let parts = vec![
            Part::image(&person.mime_type, &person.bytes),
            Part::image(&garment_image.mime_type, &garment_image.bytes),
            Part::text(lightning_instruction(&identification)),
        ];
        let image = self.generator.generate_image(parts).await?;

        Ok(LightningLook {
            person,
            composite: GenerationResult::new(image),
            identification,
        })
    }

    pub async fn run(&self, camera: &mut dyn CameraDevice) -> Result<LightningLook, AppError> {
        let (person, garment) = Self::capture_photos(camera).await?;
        log::debug!(
            "Captured person ({} bytes) and garment ({} bytes)",
            person.bytes.len(),
            garment.bytes.len()
        );
        self.process(person, garment).await
    }
}

/// Single-slot instruction; this flow has no adjustments
pub fn lightning_instruction(identification: &IdentificationResult) -> String {
    format!(
        "{} {} {} {}.",
        t(Phrase::StylePrompt),
        describe_slot(identification.body_part, &AdjustmentSet::default()),
        t(Phrase::TheItemIs),
        identification.product_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::models::BodyPartCategory;
    use crate::services::test_support::{image_response, text_response, FakeBackend};
    use async_trait::async_trait;
    use look_capture::CaptureError;
    use std::sync::Arc;

    struct ScriptedCamera {
        shots: Vec<Result<CapturedPhoto, CaptureError>>,
        opens: usize,
        releases: usize,
    }

    impl ScriptedCamera {
        fn new(shots: Vec<Result<CapturedPhoto, CaptureError>>) -> Self {
            Self {
                shots,
                opens: 0,
                releases: 0,
            }
        }
    }

    #[async_trait]
    impl CameraDevice for ScriptedCamera {
        async fn open(&mut self, _facing: Facing) -> Result<(), CaptureError> {
            self.opens += 1;
            Ok(())
        }

        async fn capture(&mut self, _facing: Facing) -> Result<CapturedPhoto, CaptureError> {
            if self.shots.is_empty() {
                return Err(CaptureError::Cancelled("closed".to_string()));
            }
            self.shots.remove(0)
        }

        fn release(&mut self) {
            self.releases += 1;
        }
    }

    fn photo(byte: u8) -> CapturedPhoto {
        CapturedPhoto::new(vec![byte], "image/jpeg", None)
    }

    fn pipeline(backend: Arc<FakeBackend>) -> LightningPipeline {
        LightningPipeline::new(
            IdentificationClient::new(backend.clone(), "classifier"),
            ImageGenerationClient::new(backend, "image-model"),
        )
    }

    #[tokio::test]
    async fn test_chest_instruction_has_no_adjustments() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_content(Ok(text_response(
                    r#"{"productName": "Striped shirt", "bodyPart": "Chest"}"#,
                )))
                .with_content(Ok(image_response(&[7, 7], "image/png"))),
        );
        let mut camera = ScriptedCamera::new(vec![Ok(photo(1)), Ok(photo(2))]);

        let look = pipeline(backend.clone()).run(&mut camera).await.unwrap();
        assert_eq!(look.identification.body_part, BodyPartCategory::Chest);
        assert_eq!(look.composite.image.bytes, vec![7, 7]);
        assert_eq!(look.person.bytes, vec![1]);
        assert_eq!(camera.releases, 1);

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        let (model, generation) = &requests[1];
        assert_eq!(model, "image-model");
        let parts = generation.parts();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].inline_data.as_ref().unwrap().decode().unwrap(), vec![1]);
        assert_eq!(parts[1].inline_data.as_ref().unwrap().decode().unwrap(), vec![2]);

        let text = parts[2].text.as_deref().unwrap();
        assert!(text.contains("Place this item on the chest."));
        assert!(text.ends_with("The item is Striped shirt."));
        assert!(!text.contains(t(Phrase::FitPrompt)));
        assert!(!text.contains(t(Phrase::FabricPrompt)));
        assert!(!text.contains(t(Phrase::NotesPrompt)));
    }

    #[tokio::test]
    async fn test_identification_failure_short_circuits() {
        let backend = Arc::new(FakeBackend::new().with_content(Ok(text_response(
            r#"{"productName": "", "bodyPart": "Chest"}"#,
        ))));
        let mut camera = ScriptedCamera::new(vec![Ok(photo(1)), Ok(photo(2))]);

        let err = pipeline(backend.clone()).run(&mut camera).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Generation(GenerationError::IdentificationIncomplete)
        ));
        assert_eq!(backend.requests().len(), 1);
        assert_eq!(camera.releases, 1);
    }

    #[tokio::test]
    async fn test_camera_released_when_user_cancels() {
        let backend = Arc::new(FakeBackend::new());
        let mut camera = ScriptedCamera::new(vec![Ok(photo(1))]);

        let err = pipeline(backend.clone()).run(&mut camera).await.unwrap_err();
        assert!(matches!(err, AppError::Cancelled));
        assert_eq!(camera.opens, 1);
        assert_eq!(camera.releases, 1);
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_camera_released_on_capture_error() {
        let backend = Arc::new(FakeBackend::new());
        let mut camera = ScriptedCamera::new(vec![Err(CaptureError::PermissionDenied(
            "camera".to_string(),
        ))]);
        let err = pipeline(backend).run(&mut camera).await.unwrap_err();
        assert!(matches!(err, AppError::Camera(CaptureError::PermissionDenied(_))));
        assert_eq!(camera.releases, 1);
    }

    #[test]
    fn test_instruction_format() {
        let identification = IdentificationResult {
            product_name: "Wool beanie".to_string(),
            body_part: BodyPartCategory::Head,
        };
        assert_eq!(
            lightning_instruction(&identification),
            format!(
                "{} Place this item on the head. The item is Wool beanie.",
                t(Phrase::StylePrompt)
            )
        );
    }
}
