use crate::error::AppError;
use gemini_client::GeminiConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "stylesync.toml";

/// Video target and polling cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub resolution: String,
    pub aspect_ratio: String,
    pub poll_interval_secs: u64,
    /// 0 polls forever
    pub max_polls: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            resolution: "720p".to_string(),
            aspect_ratio: "9:16".to_string(),
            poll_interval_secs: 10,
            max_polls: 90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub api_base: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub image_model: String,
    pub identify_model: String,
    pub video_model: String,
    pub request_timeout_secs: u64,
    pub preview_size: u32,
    pub video: VideoConfig,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_base: GeminiConfig::default().api_base,
            api_key: None,
            image_model: "gemini-2.5-flash-image".to_string(),
            identify_model: "gemini-2.5-flash".to_string(),
            video_model: "veo-3.1-fast-generate-preview".to_string(),
            request_timeout_secs: 120,
            preview_size: 256,
            video: VideoConfig::default(),
        }
    }
}

impl StudioConfig {
    /// Reads `path`, or `stylesync.toml` in the working directory if it exists,
    /// then applies environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let path: Option<PathBuf> = match path {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.is_file().then_some(default)
            }
        };

        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(&path).map_err(|e| {
                    AppError::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                log::info!("Loading configuration from {}", path.display());
                Self::from_toml(&text)
                    .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?
            }
            None => Self::default(),
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Environment wins over the file. `GEMINI_API_KEY` is preferred over `API_KEY`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_blank("GEMINI_API_KEY").or_else(|| non_blank("API_KEY")) {
            self.api_key = Some(key.trim().to_string());
        }
        if let Some(base) = non_blank("GEMINI_API_BASE") {
            self.api_base = base.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(AppError::Config(format!(
                "api_base must be an http(s) URL, got '{}'",
                self.api_base
            )));
        }
        for (name, value) in [
            ("image_model", &self.image_model),
            ("identify_model", &self.identify_model),
            ("video_model", &self.video_model),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Config(format!("{} must not be empty", name)));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.preview_size == 0 {
            return Err(AppError::Config("preview_size must be greater than 0".to_string()));
        }
        if self.video.poll_interval_secs == 0 {
            return Err(AppError::Config(
                "video.poll_interval_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_base: self.api_base.clone(),
            request_timeout_secs: self.request_timeout_secs,
            ..GeminiConfig::default()
        }
    }

    /// Copy safe to print
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.api_key.is_some() {
            copy.api_key = Some("********".to_string());
        }
        copy
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}
