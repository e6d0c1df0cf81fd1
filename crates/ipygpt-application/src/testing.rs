//! Test doubles shared by the unit tests.

use async_trait::async_trait;
use ipygpt_core::{
    ChatBackend, ChatRequest, DisplayAdapter, DisplayResult, IpygptError, ModelInfo, Result,
};
use std::sync::Mutex;

/// Backend that records requests and answers from a script.
pub struct FakeBackend {
    reply: std::result::Result<String, IpygptError>,
    models: Vec<ModelInfo>,
    requests: Mutex<Vec<ChatRequest>>,
    model_keys: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            models: Vec::new(),
            requests: Mutex::new(Vec::new()),
            model_keys: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: IpygptError) -> Self {
        Self {
            reply: Err(err),
            ..Self::replying("")
        }
    }

    pub fn with_models(mut self, ids: &[&str]) -> Self {
        self.models = ids
            .iter()
            .map(|id| ModelInfo {
                id: id.to_string(),
                owned_by: Some("openai".to_string()),
                created: None,
            })
            .collect();
        self
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn model_keys(&self) -> Vec<String> {
        self.model_keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone()
    }

    async fn list_models(&self, api_key: &str) -> Result<Vec<ModelInfo>> {
        self.model_keys.lock().unwrap().push(api_key.to_string());
        match &self.reply {
            Ok(_) => Ok(self.models.clone()),
            Err(err) => Err(err.clone()),
        }
    }
}

/// Display that keeps everything it was asked to render.
#[derive(Default)]
pub struct RecordingDisplay {
    pub rendered: std::sync::Arc<Mutex<Vec<DisplayResult>>>,
}

impl DisplayAdapter for RecordingDisplay {
    fn render(&self, result: &DisplayResult) {
        self.rendered.lock().unwrap().push(result.clone());
    }
}
