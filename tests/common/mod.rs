//! Shared test helpers and mock provider.
#![allow(dead_code)]

use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use alfred::error::AlfredError;
use alfred::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use alfred::types::*;

/// A mock provider that returns canned responses in order and records
/// every request it receives.
pub struct MockProvider {
    model_id: String,
    responses: Mutex<Vec<Result<ProviderResponse, AlfredError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            responses: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a text response.
    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push(Ok(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
            tool_calls: vec![],
        }));
    }

    /// Queue a tool call response.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.queue_tool_calls(vec![(id, name, args)]);
    }

    /// Queue a response carrying several tool calls at once.
    pub fn queue_tool_calls(&self, calls: Vec<(&str, &str, serde_json::Value)>) {
        self.responses.lock().unwrap().push(Ok(ProviderResponse {
            text: String::new(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            },
            tool_calls: calls
                .into_iter()
                .map(|(id, name, arguments)| AgentToolCall {
                    id: id.to_string(),
                    name: name.to_string(),
                    arguments,
                })
                .collect(),
        }));
    }

    /// Queue a failed model call.
    pub fn queue_error(&self, err: AlfredError) {
        self.responses.lock().unwrap().push(Err(err));
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, AlfredError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(ProviderResponse {
                text: "Mock response".to_string(),
                usage: Usage::default(),
                tool_calls: vec![],
            });
        }
        responses.remove(0)
    }
}

/// Write `contents` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    path
}

pub const PEOPLE_CSV: &str = "Name,Age,Score\nAlice,20,1\nBob,30,2\nCarol,40,3\nDan,50,4\n";
