use crate::error::{AppError, GenerationError};
use crate::models::EncodedImage;
use gemini_client::{GenerateContentRequest, GenerationConfig, GenerativeBackend, Part};
use std::sync::Arc;

const DEFAULT_IMAGE_MIME: &str = "image/png";

/// One request/response round trip to the image model
#[derive(Clone)]
pub struct ImageGenerationClient {
    backend: Arc<dyn GenerativeBackend>,
    model: String,
}

impl ImageGenerationClient {
    pub fn new(backend: Arc<dyn GenerativeBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    /// Succeeds only if the first part of the answer is inline image data.
    /// No retry.
    pub async fn generate_image(&self, parts: Vec<Part>) -> Result<EncodedImage, AppError> {
        let request = GenerateContentRequest::new(parts).with_config(GenerationConfig::image_only());
        log::debug!(
            "Requesting image from {} with {} parts",
            self.model,
            request.parts().len()
        );

        let response = self.backend.generate_content(&self.model, &request).await?;

        let inline = response
            .first_part()
            .filter(|part| part.has_inline_data())
            .and_then(|part| part.inline_data.as_ref())
            .ok_or_else(|| {
                log::warn!("Image response had no inline data in its first part");
                GenerationError::NoImageOutput
            })?;

        let bytes = inline
            .decode()
            .map_err(|e| GenerationError::MalformedResponse(format!("image payload: {}", e)))?;
        if bytes.is_empty() {
            return Err(GenerationError::NoImageOutput.into());
        }

        let mime = if inline.mime_type.trim().is_empty() {
            DEFAULT_IMAGE_MIME
        } else {
            inline.mime_type.as_str()
        };
        Ok(EncodedImage::new(bytes, mime))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{image_response, parts_response, text_response, FakeBackend};
    use gemini_client::ClientError;

    #[tokio::test]
    async fn test_first_part_image_is_returned() {
        let backend = Arc::new(FakeBackend::new().with_content(Ok(image_response(&[1, 2, 3], "image/jpeg"))));
        let client = ImageGenerationClient::new(backend.clone(), "image-model");

        let image = client.generate_image(vec![Part::text("hi")]).await.unwrap();
        assert_eq!(image.bytes, vec![1, 2, 3]);
        assert_eq!(image.mime_type, "image/jpeg");

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "image-model");
        assert_eq!(
            requests[0].1.generation_config,
            Some(GenerationConfig::image_only())
        );
    }

    #[tokio::test]
    async fn test_text_only_is_failure() {
        let backend = Arc::new(FakeBackend::new().with_content(Ok(text_response("I cannot do that"))));
        let client = ImageGenerationClient::new(backend, "m");
        let err = client.generate_image(vec![]).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Generation(GenerationError::NoImageOutput)
        ));
    }

    #[tokio::test]
    async fn test_image_in_second_part_is_failure() {
        let response = parts_response(vec![Part::text("here you go"), Part::image("image/png", &[1])]);
        let backend = Arc::new(FakeBackend::new().with_content(Ok(response)));
        let client = ImageGenerationClient::new(backend, "m");
        assert!(matches!(
            client.generate_image(vec![]).await,
            Err(AppError::Generation(GenerationError::NoImageOutput))
        ));
    }

    #[tokio::test]
    async fn test_transport_error_is_not_retried() {
        let backend = Arc::new(
            FakeBackend::new().with_content(Err(ClientError::Network("reset".to_string()))),
        );
        let client = ImageGenerationClient::new(backend.clone(), "m");
        assert!(client.generate_image(vec![]).await.is_err());
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_identical_parts_identical_bytes() {
        let backend = Arc::new(FakeBackend::echo());
        let client = ImageGenerationClient::new(backend, "m");
        let parts = vec![Part::image("image/jpeg", &[9, 9]), Part::text("style")];

        let first = client.generate_image(parts.clone()).await.unwrap();
        let second = client.generate_image(parts).await.unwrap();
        assert_eq!(first, second);
    }
}
