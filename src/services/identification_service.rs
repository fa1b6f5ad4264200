use crate::error::{AppError, GenerationError};
use crate::i18n::{t, Phrase};
use crate::models::{BodyPartCategory, EncodedImage, IdentificationResult};
use gemini_client::{GenerateContentRequest, GenerationConfig, GenerativeBackend, Part};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Response schema: a product name and one of the body part literals
pub fn identification_schema() -> Value {
    let body_parts: Vec<&str> = BodyPartCategory::ALL.iter().map(|c| c.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "productName": { "type": "STRING" },
            "bodyPart": { "type": "STRING", "enum": body_parts },
        },
        "required": ["productName", "bodyPart"],
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIdentification {
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    body_part: Option<String>,
}

/// Classifies a garment photo into a product name and body part
#[derive(Clone)]
pub struct IdentificationClient {
    backend: Arc<dyn GenerativeBackend>,
    model: String,
}

impl IdentificationClient {
    pub fn new(backend: Arc<dyn GenerativeBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    pub async fn identify(&self, garment: &EncodedImage) -> Result<IdentificationResult, AppError> {
        let request = GenerateContentRequest::new(vec![
            Part::image(&garment.mime_type, &garment.bytes),
            Part::text(t(Phrase::IdentifyPrompt)),
        ])
        .with_config(GenerationConfig::json_schema(identification_schema()));

        log::debug!("Identifying garment with {}", self.model);
        let response = self.backend.generate_content(&self.model, &request).await?;
        let text = response
            .text()
            .ok_or(GenerationError::IdentificationIncomplete)?;

        let result = parse_identification(&text)?;
        log::info!(
            "Identified '{}' on {}",
            result.product_name,
            result.body_part
        );
        Ok(result)
    }
}

fn parse_identification(text: &str) -> Result<IdentificationResult, GenerationError> {
    let raw: RawIdentification = serde_json::from_str(text.trim())
        .map_err(|e| GenerationError::MalformedResponse(format!("identification: {}", e)))?;

    let product_name = raw
        .product_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or(GenerationError::IdentificationIncomplete)?;
    let body_part = raw
        .body_part
        .as_deref()
        .and_then(BodyPartCategory::parse)
        .ok_or(GenerationError::IdentificationIncomplete)?;

    Ok(IdentificationResult {
        product_name,
        body_part,
    })
}
