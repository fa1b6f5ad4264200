use crate::config::StudioConfig;
use crate::error::{AppError, GenerationError, NetworkError};
use crate::i18n::{t, Phrase};
use crate::models::{GenerationResult, VideoResult};
use gemini_client::{GenerativeBackend, InlineData, VideoOperation, VideoRequest, ENTITY_NOT_FOUND};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Progress phrases shown while a video renders; the sequence repeats
pub const VIDEO_STATUS_MESSAGES: [&str; 8] = [
    "Initializing video synthesis...",
    "Warming up the digital runway...",
    "Analyzing style composition...",
    "Generating photorealistic frames...",
    "Stitching scenes together...",
    "Applying final lighting effects...",
    "Rendering high-definition video...",
    "Almost ready for the premiere...",
];

const DEFAULT_VIDEO_MIME: &str = "video/mp4";

#[derive(Debug, Clone, PartialEq)]
pub struct VideoSettings {
    pub model: String,
    pub prompt: String,
    pub resolution: String,
    pub aspect_ratio: String,
    pub poll_interval: Duration,
    /// `None` polls until the server says done
    pub max_polls: Option<u32>,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self::from_config(&StudioConfig::default())
    }
}

impl VideoSettings {
    pub fn from_config(config: &StudioConfig) -> Self {
        Self {
            model: config.video_model.clone(),
            prompt: t(Phrase::VideoPrompt).to_string(),
            resolution: config.video.resolution.clone(),
            aspect_ratio: config.video.aspect_ratio.clone(),
            poll_interval: Duration::from_secs(config.video.poll_interval_secs),
            max_polls: (config.video.max_polls > 0).then_some(config.video.max_polls),
        }
    }
}

/// What a running video job reports
#[derive(Debug)]
pub enum VideoEvent {
    Progress(String),
    Completed(VideoResult),
    Failed(AppError),
}

impl VideoEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, VideoEvent::Progress(_))
    }
}

/// Handle on a spawned video job.
///
/// Events arrive in order and end with exactly one terminal event. Dropping the
/// handle stops the polling; the remote job itself keeps running.
pub struct VideoJob {
    events: mpsc::UnboundedReceiver<VideoEvent>,
    cancel: CancellationToken,
    finished: bool,
}

impl VideoJob {
    /// Next event, or `None` once the terminal event was delivered
    pub async fn next_event(&mut self) -> Option<VideoEvent> {
        if self.finished {
            return None;
        }
        let event = self.events.recv().await;
        match &event {
            Some(e) if !e.is_terminal() => {}
            _ => self.finished = true,
        }
        event
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Drains the job, handing every progress message to `on_progress`
    pub async fn wait(mut self, mut on_progress: impl FnMut(&str)) -> Result<VideoResult, AppError> {
        while let Some(event) = self.next_event().await {
            match event {
                VideoEvent::Progress(message) => on_progress(&message),
                VideoEvent::Completed(video) => return Ok(video),
                VideoEvent::Failed(e) => return Err(e),
            }
        }
        // task went away without a terminal event
        Err(AppError::Cancelled)
    }
}

impl Drop for VideoJob {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Submits an image-to-video job and polls it to completion
#[derive(Clone)]
pub struct VideoPoller {
    backend: Arc<dyn GenerativeBackend>,
    settings: VideoSettings,
}

impl VideoPoller {
    pub fn new(backend: Arc<dyn GenerativeBackend>, settings: VideoSettings) -> Self {
        Self { backend, settings }
    }

    /// Spawns the poll loop for `composite` on the current runtime
    pub fn start(&self, composite: &GenerationResult) -> VideoJob {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let poller = self.clone();
        let composite = composite.clone();
        let token = cancel.clone();
        tokio::spawn(async move {
            let event = match poller.run(&composite, &tx, &token).await {
                Ok(video) => VideoEvent::Completed(video),
                Err(e) => {
                    log::error!("Video generation failed: {}", e);
                    VideoEvent::Failed(e)
                }
            };
            let _ = tx.send(event);
        });

        VideoJob {
            events: rx,
            cancel,
            finished: false,
        }
    }

    /// The poll loop. Progress goes to `events`; the outcome is returned.
    pub async fn run(
        &self,
        composite: &GenerationResult,
        events: &mpsc::UnboundedSender<VideoEvent>,
        cancel: &CancellationToken,
    ) -> Result<VideoResult, AppError> {
        let emit = |message: &str| {
            let _ = events.send(VideoEvent::Progress(message.to_string()));
        };

        let request = VideoRequest {
            prompt: self.settings.prompt.clone(),
            image: InlineData::from_bytes(&composite.image.mime_type, &composite.image.bytes),
            resolution: self.settings.resolution.clone(),
            aspect_ratio: self.settings.aspect_ratio.clone(),
            number_of_videos: 1,
        };
        let mut operation = self
            .backend
            .submit_video(&self.settings.model, &request)
            .await?;
        log::info!("Video job submitted: {}", operation.name);

        let mut status_index = 0;
        emit(VIDEO_STATUS_MESSAGES[status_index]);

        let mut polls: u32 = 0;
        while !operation.done {
            if let Some(max) = self.settings.max_polls {
                if polls >= max {
                    log::warn!("Video job {} still running after {} polls", operation.name, polls);
                    return Err(AppError::Timeout { polls });
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    log::info!("Video polling cancelled after {} polls", polls);
                    return Err(AppError::Cancelled);
                }
                _ = tokio::time::sleep(self.settings.poll_interval) => {}
            }

            status_index = (status_index + 1) % VIDEO_STATUS_MESSAGES.len();
            emit(VIDEO_STATUS_MESSAGES[status_index]);

            operation = self.backend.poll_video(&operation).await?;
            polls += 1;
            log::debug!("Video poll {}: done={}", polls, operation.done);
        }

        let video = self.finish(&operation, composite).await?;
        emit(t(Phrase::VideoGenerated));
        Ok(video)
    }

    async fn finish(
        &self,
        operation: &VideoOperation,
        composite: &GenerationResult,
    ) -> Result<VideoResult, AppError> {
        if let Some(error) = &operation.error {
            if error.code == Some(404) || error.message.contains(ENTITY_NOT_FOUND) {
                return Err(AppError::Credential(error.message.clone()));
            }
            return Err(GenerationError::OperationFailed(error.message.clone()).into());
        }

        let locator = operation
            .media_locator()
            .ok_or(GenerationError::NoDownloadLink)?;

        let download = self.backend.download_media(&locator).await?;
        if !download.is_success() || download.bytes.is_empty() {
            log::warn!("Video download returned status {}", download.status);
            return Err(NetworkError::DownloadFailed {
                status: download.status,
            }
            .into());
        }

        Ok(VideoResult {
            source: composite.id,
            bytes: download.bytes,
            mime_type: download
                .mime_type
                .filter(|m| m.starts_with("video/"))
                .unwrap_or_else(|| DEFAULT_VIDEO_MIME.to_string()),
        })
    }
}
