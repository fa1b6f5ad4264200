use crate::i18n::{t, Phrase};
use crate::models::BodyPartCategory;
use gemini_client::ClientError;
use look_capture::{CaptureError, PreviewError};

/// A precondition the user has to fix before the operation can run
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no model photo")]
    NoModelPhoto,
    #[error("no garment in the look")]
    EmptyLook,
    #[error("no generated image")]
    NoGeneratedImage,
    #[error("no garment on {0}")]
    EmptySlot(BodyPartCategory),
    #[error("styling notes are longer than {0} characters")]
    NotesTooLong(usize),
    #[error("unknown {kind}: {value}")]
    Unknown { kind: &'static str, value: String },
    #[error("another generation is still running")]
    Busy,
    #[error("video does not belong to the current image")]
    StaleVideo,
}

/// The capability answered but the answer is unusable
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("no image in response")]
    NoImageOutput,
    #[error("identification incomplete")]
    IdentificationIncomplete,
    #[error("video finished without a download link")]
    NoDownloadLink,
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("operation failed: {0}")]
    OperationFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("download failed with status {status}")]
    DownloadFailed { status: u16 },
    #[error("server returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
}

/// Central error type for the studio
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
    #[error("Credential rejected: {0}")]
    Credential(String),
    #[error("Camera error: {0}")]
    Camera(CaptureError),
    #[error("Cancelled")]
    Cancelled,
    #[error("Gave up after {polls} polls")]
    Timeout { polls: u32 },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),
    #[error("Image processing error: {0}")]
    ImageProcessing(String),
}

/// User-facing operations; each reports failure with a single message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ImageGeneration,
    VideoGeneration,
    Lightning,
    Upload,
}

impl From<ClientError> for AppError {
    fn from(e: ClientError) -> Self {
        if e.is_credential_rejection() {
            return AppError::Credential(e.to_string());
        }
        match e {
            ClientError::Status { status, message } => {
                AppError::Network(NetworkError::Status { status, message })
            }
            ClientError::Network(msg) | ClientError::InvalidUrl(msg) => {
                AppError::Network(NetworkError::Transport(msg))
            }
            ClientError::Json(msg) => {
                AppError::Generation(GenerationError::MalformedResponse(msg))
            }
            ClientError::MissingApiKey => AppError::Credential("no API key selected".to_string()),
        }
    }
}

impl From<CaptureError> for AppError {
    fn from(e: CaptureError) -> Self {
        match e {
            CaptureError::Cancelled(_) => AppError::Cancelled,
            other => AppError::Camera(other),
        }
    }
}

impl From<PreviewError> for AppError {
    fn from(e: PreviewError) -> Self {
        AppError::ImageProcessing(e.to_string())
    }
}

impl AppError {
    pub fn is_credential(&self) -> bool {
        matches!(self, AppError::Credential(_))
    }

    /// The one message shown for a failed operation
    pub fn user_message(&self, operation: Operation) -> String {
        match self {
            AppError::Validation(ValidationError::NoModelPhoto) => t(Phrase::ErrorNoModel).into(),
            AppError::Validation(ValidationError::EmptyLook) => t(Phrase::ErrorEmptyLook).into(),
            AppError::Validation(ValidationError::NoGeneratedImage) => {
                t(Phrase::ErrorNoGeneratedImage).into()
            }
            AppError::Validation(e) => capitalize(&e.to_string()),
            AppError::Credential(_) => t(Phrase::ErrorApiKey).into(),
            AppError::Cancelled => t(Phrase::Cancelled).into(),
            AppError::Camera(_) => t(Phrase::ErrorCamera).into(),
            _ => match operation {
                Operation::ImageGeneration => t(Phrase::ErrorImageGeneration).into(),
                Operation::VideoGeneration => t(Phrase::ErrorVideoGeneration).into(),
                Operation::Lightning => self.lightning_message(),
                Operation::Upload => t(Phrase::ErrorUpload).into(),
            },
        }
    }

    // The lightning flow shows what actually went wrong
    fn lightning_message(&self) -> String {
        match self {
            AppError::Generation(GenerationError::NoImageOutput) => {
                t(Phrase::ErrorNoImageGenerated).into()
            }
            AppError::Generation(GenerationError::IdentificationIncomplete)
            | AppError::Generation(GenerationError::MalformedResponse(_)) => {
                t(Phrase::ErrorIdentification).into()
            }
            AppError::Network(NetworkError::Status { message, .. }) if !message.is_empty() => {
                message.clone()
            }
            _ => t(Phrase::ErrorLightning).into(),
        }
    }

    /// Message for a video failure that happened after submission
    pub fn video_detail(&self) -> String {
        match self {
            AppError::Generation(GenerationError::NoDownloadLink) => {
                t(Phrase::ErrorNoDownloadLink).into()
            }
            AppError::Network(NetworkError::DownloadFailed { status }) => {
                format!("{}: {}", t(Phrase::ErrorDownloadVideo), status)
            }
            other => other.to_string(),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}
