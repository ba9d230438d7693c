//! Model provider trait and the hosted OpenAI implementation.

pub mod format;
pub mod http;
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::AlfredConfig;
use crate::error::AlfredError;
use crate::models::OpenAiModel;
use crate::tools::Tool;
use crate::types::{AgentToolCall, GenerationSettings, ModelMessage, Usage};

/// A request sent to a model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Describe a registered tool for the wire.
    pub fn from_tool(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: tool.parameters().schema.clone(),
        }
    }
}

/// Response from a provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
    pub tool_calls: Vec<AgentToolCall>,
}

/// Core trait implemented by model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Single-turn completion (text, multimodal, or tool-call request).
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, AlfredError>;
}

/// Which configured model a provider is being built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelRole {
    /// Plans the next step and requests tools.
    Planner,
    /// Transcribes images for `extract_text`.
    Vision,
}

/// Create a provider for the planner or vision model using the given config.
pub fn create_provider(
    config: &AlfredConfig,
    role: ModelRole,
) -> Result<Arc<dyn ModelProvider>, AlfredError> {
    let api_key = config
        .api_key
        .clone()
        .ok_or_else(|| AlfredError::Authentication("Missing OPENAI_API_KEY".into()))?;

    let model_id = match role {
        ModelRole::Planner => &config.model,
        ModelRole::Vision => &config.vision_model,
    };
    let model: OpenAiModel = model_id
        .parse()
        .map_err(|_| AlfredError::ModelNotFound(model_id.clone()))?;

    let caps = model.capabilities();
    match role {
        ModelRole::Planner if !caps.supports_tools => {
            return Err(AlfredError::Configuration(format!(
                "model '{model_id}' does not support tool calling"
            )));
        }
        ModelRole::Vision if !caps.supports_vision => {
            return Err(AlfredError::Configuration(format!(
                "model '{model_id}' does not accept image input"
            )));
        }
        _ => {}
    }

    Ok(Arc::new(openai::OpenAiProvider::new(
        model,
        api_key,
        config.base_url.clone(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key() -> AlfredConfig {
        AlfredConfig {
            api_key: Some("sk-test".into()),
            ..AlfredConfig::default()
        }
    }

    #[test]
    fn missing_key_is_authentication_error() {
        let err = match create_provider(&AlfredConfig::default(), ModelRole::Planner) {
            Ok(_) => panic!("expected missing key error"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn builds_planner_provider() {
        let provider = create_provider(&config_with_key(), ModelRole::Planner).unwrap();
        assert_eq!(provider.provider_name(), "openai");
        assert_eq!(provider.model_id(), "gpt-4o");
    }

    #[test]
    fn rejects_text_only_vision_model() {
        let config = AlfredConfig {
            vision_model: "gpt-3.5-turbo".into(),
            ..config_with_key()
        };
        let err = match create_provider(&config, ModelRole::Vision) {
            Ok(_) => panic!("expected configuration error"),
            Err(err) => err,
        };
        assert!(matches!(err, AlfredError::Configuration(msg) if msg.contains("image input")));
    }
}
