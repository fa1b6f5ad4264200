// Scripted stand-ins for the remote capabilities

use async_trait::async_trait;
use gemini_client::{
    ClientError, Content, Candidate, GenerateContentRequest, GenerateContentResponse,
    GenerativeBackend, InlineData, MediaDownload, Part, VideoOperation, VideoRequest,
};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn image_response(bytes: &[u8], mime: &str) -> GenerateContentResponse {
    parts_response(vec![Part::image(mime, bytes)])
}

pub fn text_response(text: &str) -> GenerateContentResponse {
    parts_response(vec![Part::text(text)])
}

pub fn parts_response(parts: Vec<Part>) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: Some(Content {
                role: Some("model".to_string()),
                parts,
            }),
            finish_reason: Some("STOP".to_string()),
        }],
    }
}

pub fn finished_with(uri: Option<&str>) -> VideoOperation {
    let response = match uri {
        Some(uri) => json!({
            "generateVideoResponse": {
                "generatedSamples": [{ "video": { "uri": uri } }]
            }
        }),
        None => json!({ "generateVideoResponse": { "generatedSamples": [] } }),
    };
    VideoOperation {
        name: "operations/video-1".to_string(),
        done: true,
        error: None,
        response: Some(response),
    }
}

#[derive(Default)]
pub struct FakeBackend {
    content: Mutex<VecDeque<Result<GenerateContentResponse, ClientError>>>,
    echo: bool,
    submit: Mutex<Option<Result<VideoOperation, ClientError>>>,
    polls: Mutex<VecDeque<Result<VideoOperation, ClientError>>>,
    download: Mutex<Option<Result<MediaDownload, ClientError>>>,
    requests: Mutex<Vec<(String, GenerateContentRequest)>>,
    video_requests: Mutex<Vec<VideoRequest>>,
    downloads: Mutex<Vec<String>>,
    poll_count: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every content call with an image derived from the request bytes
    pub fn echo() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }

    pub fn with_content(self, response: Result<GenerateContentResponse, ClientError>) -> Self {
        self.lock_content().push_back(response);
        self
    }

    /// `pending` not-done polls, then `last`
    pub fn with_video(self, pending: usize, last: Result<VideoOperation, ClientError>) -> Self {
        *self.submit.lock().unwrap() = Some(Ok(VideoOperation::pending("operations/video-1")));
        {
            let mut polls = self.polls.lock().unwrap();
            for _ in 0..pending {
                polls.push_back(Ok(VideoOperation::pending("operations/video-1")));
            }
            polls.push_back(last);
        }
        self
    }

    pub fn with_submit(self, result: Result<VideoOperation, ClientError>) -> Self {
        *self.submit.lock().unwrap() = Some(result);
        self
    }

    pub fn with_download(self, result: Result<MediaDownload, ClientError>) -> Self {
        *self.download.lock().unwrap() = Some(result);
        self
    }

    pub fn requests(&self) -> Vec<(String, GenerateContentRequest)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn video_requests(&self) -> Vec<VideoRequest> {
        self.video_requests.lock().unwrap().clone()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }

    pub fn poll_count(&self) -> usize {
        self.poll_count.load(Ordering::SeqCst)
    }

    fn lock_content(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<GenerateContentResponse, ClientError>>> {
        self.content.lock().unwrap()
    }
}

#[async_trait]
impl GenerativeBackend for FakeBackend {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ClientError> {
        self.requests
            .lock()
            .unwrap()
            .push((model.to_string(), request.clone()));

        if let Some(scripted) = self.lock_content().pop_front() {
            return scripted;
        }
        if self.echo {
            let mut bytes = Vec::new();
            for part in request.parts() {
                if let Some(text) = &part.text {
                    bytes.extend_from_slice(text.as_bytes());
                }
                if let Some(InlineData { data, .. }) = &part.inline_data {
                    bytes.extend_from_slice(data.as_bytes());
                }
            }
            return Ok(image_response(&bytes, "image/png"));
        }
        Err(ClientError::Network("no scripted response".to_string()))
    }

    async fn submit_video(
        &self,
        _model: &str,
        request: &VideoRequest,
    ) -> Result<VideoOperation, ClientError> {
        self.video_requests.lock().unwrap().push(request.clone());
        self.submit
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(ClientError::Network("no scripted submit".to_string())))
    }

    async fn poll_video(&self, _operation: &VideoOperation) -> Result<VideoOperation, ClientError> {
        self.poll_count.fetch_add(1, Ordering::SeqCst);
        self.polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(VideoOperation::pending("operations/video-1")))
    }

    async fn download_media(&self, locator: &str) -> Result<MediaDownload, ClientError> {
        self.downloads.lock().unwrap().push(locator.to_string());
        self.download.lock().unwrap().take().unwrap_or_else(|| {
            Ok(MediaDownload {
                status: 200,
                mime_type: Some("video/mp4".to_string()),
                bytes: b"mp4-bytes".to_vec(),
            })
        })
    }
}
