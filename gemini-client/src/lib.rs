//! # Gemini Client
//!
//! A small client for the generative model REST API used by the try-on studio.
//!
//! This crate provides:
//! - Wire types for multi-part content generation requests and responses
//! - Long-running video operations (submit, poll, download)
//! - A [`GenerativeBackend`] trait so callers can swap the HTTP transport for a fake
//! - API key storage and a credential gate with a session-scoped presence flag
//!
//! ## Separation of Concerns
//!
//! This crate only shapes requests and transports them. It does **not**:
//! - Decide what counts as a usable result (handled by the application)
//! - Drive the video poll loop (handled by the application)
//! - Ask the user for a key (the application supplies the prompt)
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use gemini_client::{ApiKeyStore, GeminiConfig, GeminiService, GenerateContentRequest, Part};
//!
//! let keys = ApiKeyStore::new(std::env::var("GEMINI_API_KEY").ok());
//! let service = GeminiService::new(GeminiConfig::default(), keys)?;
//!
//! let request = GenerateContentRequest::new(vec![Part::text("Describe this outfit")]);
//! let response = service.generate_content("gemini-2.5-flash", &request).await?;
//! ```

pub mod credential;
pub mod models;
pub mod service;

pub use credential::{ApiKeyStore, CredentialGate, CredentialState, GateError, StoreGate};
pub use models::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, MediaDownload, OperationError, Part, VideoOperation, VideoRequest,
};
pub use service::{
    append_api_key, redact_locator, ClientError, GeminiConfig, GeminiService, GenerativeBackend,
    ENTITY_NOT_FOUND,
};
