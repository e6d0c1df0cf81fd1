use async_trait::async_trait;
use ipygpt_application::MagicHost;
use ipygpt_core::{
    ChatBackend, ChatConfig, ChatRequest, DisplayAdapter, DisplayResult, IpygptError, ModelInfo,
    Result,
};
use ipygpt_infrastructure::{Dashboard, DashboardSettings};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Backend answering from a queue of scripted replies.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String>>>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(IpygptError::api(None, "no scripted reply left")))
    }

    async fn list_models(&self, _api_key: &str) -> Result<Vec<ModelInfo>> {
        Ok(Vec::new())
    }
}

#[derive(Clone, Default)]
pub struct SharedDisplay(pub Arc<Mutex<Vec<DisplayResult>>>);

impl DisplayAdapter for SharedDisplay {
    fn render(&self, result: &DisplayResult) {
        self.0.lock().unwrap().push(result.clone());
    }
}

pub fn settings(temp_dir: &TempDir) -> DashboardSettings {
    DashboardSettings {
        enabled: false,
        log_dir: temp_dir.path().to_path_buf(),
        ..DashboardSettings::default()
    }
}

pub fn host_with(
    config: ChatConfig,
    backend: Arc<ScriptedBackend>,
    temp_dir: &TempDir,
) -> (MagicHost, SharedDisplay) {
    let display = SharedDisplay::default();
    let dashboard = Dashboard::launch(&settings(temp_dir)).unwrap();
    let host = MagicHost::new(config, backend, Box::new(display.clone()), dashboard);
    (host, display)
}

pub fn keyed_config() -> ChatConfig {
    ChatConfig {
        api_key: Some("sk-test".to_string()),
        ..ChatConfig::default()
    }
}
