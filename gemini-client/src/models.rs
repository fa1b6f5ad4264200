use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Base64 payload of a binary part
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(alias = "mime_type")]
    pub mime_type: String,
    pub data: String,
}

impl InlineData {
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(self.data.as_bytes())
    }
}

/// One element of a multi-part request or response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "inline_data")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn image(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData::from_bytes(mime_type, bytes)),
        }
    }

    /// True if the part carries a non-empty binary payload
    pub fn has_inline_data(&self) -> bool {
        self.inline_data
            .as_ref()
            .map(|d| !d.data.is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Output constraints attached to a content generation request
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

impl GenerationConfig {
    /// Ask for image output only
    pub fn image_only() -> Self {
        Self {
            response_modalities: Some(vec!["IMAGE".to_string()]),
            ..Default::default()
        }
    }

    /// Ask for JSON text constrained to `schema`
    pub fn json_schema(schema: Value) -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Single user turn made of `parts`, in order
    pub fn new(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: None,
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    pub fn parts(&self) -> &[Part] {
        self.contents
            .first()
            .map(|c| c.parts.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// First part of the first candidate, if any
    pub fn first_part(&self) -> Option<&Part> {
        self.candidates.first()?.content.as_ref()?.parts.first()
    }

    /// Concatenated text of the first candidate
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Image-to-video job description
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRequest {
    pub prompt: String,
    pub image: InlineData,
    pub resolution: String,
    pub aspect_ratio: String,
    pub number_of_videos: u32,
}

impl VideoRequest {
    /// Body for the `predictLongRunning` endpoint
    pub fn to_wire(&self) -> Value {
        json!({
            "instances": [{
                "prompt": self.prompt,
                "image": {
                    "bytesBase64Encoded": self.image.data,
                    "mimeType": self.image.mime_type,
                }
            }],
            "parameters": {
                "aspectRatio": self.aspect_ratio,
                "resolution": self.resolution,
                "sampleCount": self.number_of_videos,
            }
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OperationError {
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default)]
    pub message: String,
}

/// Handle of a long-running video job
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VideoOperation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl VideoOperation {
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// URI of the first generated video.
    ///
    /// Accepts both the REST shape (`generateVideoResponse.generatedSamples`)
    /// and the SDK shape (`generatedVideos`).
    pub fn media_locator(&self) -> Option<String> {
        let response = self.response.as_ref()?;
        let samples = response
            .get("generateVideoResponse")
            .and_then(|r| r.get("generatedSamples"))
            .or_else(|| response.get("generatedVideos"))
            .and_then(Value::as_array)?;
        samples
            .first()?
            .get("video")?
            .get("uri")?
            .as_str()
            .map(str::trim)
            .filter(|uri| !uri.is_empty())
            .map(str::to_string)
    }
}

/// Raw result of fetching a media locator
#[derive(Debug, Clone, PartialEq)]
pub struct MediaDownload {
    pub status: u16,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl MediaDownload {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
