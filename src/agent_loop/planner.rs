//! Planning step: decide between answering and calling a tool.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::provider::{ModelProvider, ProviderRequest, ToolDefinition};
use crate::tools::{Tool, TOOL_CATALOG};
use crate::types::{GenerationSettings, ModelMessage, Usage};

use super::types::AgentState;

const PERSONA: &str = "You are a helpful vision Agent named Alfred that serves Mr. Wayne and Batman.\n\
You can analyze documents, CSV files, and run computations with tools:";

const NO_IMAGE: &str = "Error: No valid image file provided for text extraction";
const NO_CSV: &str = "Error: No valid CSV file provided for analysis";

/// The turn a planning step produced.
#[derive(Debug, Clone)]
pub struct PlannerOutput {
    pub message: ModelMessage,
    pub usage: Usage,
}

/// Model-backed planner. Never fails: problems come back as system turns.
pub struct Planner {
    provider: Arc<dyn ModelProvider>,
    tools: Vec<ToolDefinition>,
    settings: GenerationSettings,
}

impl Planner {
    pub fn new(provider: Arc<dyn ModelProvider>, tools: &[Arc<dyn Tool>]) -> Self {
        Self {
            provider,
            tools: tools
                .iter()
                .map(|t| ToolDefinition::from_tool(t.as_ref()))
                .collect(),
            settings: GenerationSettings::builder()
                .parallel_tool_calls(false)
                .build(),
        }
    }

    /// Produce the next turn for `state`.
    pub async fn plan(&self, state: &AgentState) -> PlannerOutput {
        info!(turns = state.messages.len(), "planning");
        if let Some(problem) = missing_input(state) {
            error!(
                image = ?state.input_file,
                csv = ?state.input_csv,
                "{problem}"
            );
            return PlannerOutput {
                message: ModelMessage::system(problem),
                usage: Usage::default(),
            };
        }

        let mut messages = Vec::with_capacity(state.messages.len() + 1);
        messages.push(ModelMessage::system(system_prompt(state)));
        messages.extend(state.messages.iter().cloned());
        let request = ProviderRequest {
            messages,
            settings: self.settings.clone(),
            tools: (!self.tools.is_empty()).then(|| self.tools.clone()),
        };

        let response = match self.provider.generate_text(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "planner model call failed");
                return PlannerOutput {
                    message: ModelMessage::system(format!("Error in assistant: {e}")),
                    usage: Usage::default(),
                };
            }
        };
        debug!(
            tool_calls = response.tool_calls.len(),
            text_len = response.text.len(),
            "planner response received"
        );

        let mut calls = response.tool_calls.into_iter();
        let message = match calls.next() {
            Some(first) => {
                let dropped = calls.count();
                if dropped > 0 {
                    warn!(kept = %first.name, dropped, "ignoring extra tool calls");
                }
                ModelMessage::assistant_tool_call(response.text, first)
            }
            None => ModelMessage::assistant(response.text),
        };

        PlannerOutput {
            message,
            usage: response.usage,
        }
    }
}

/// Short-circuit message when the request names a tool whose input is absent.
fn missing_input(state: &AgentState) -> Option<&'static str> {
    let last = state.latest_user_text().to_lowercase();
    if (last.contains("extract_text") || last.contains("extract text"))
        && !file_exists(state.image_path())
    {
        return Some(NO_IMAGE);
    }
    if (last.contains("analyze_csv") || last.contains("average") || last.contains("summarize"))
        && !file_exists(state.csv_path())
    {
        return Some(NO_CSV);
    }
    None
}

fn file_exists(path: Option<&Path>) -> bool {
    path.is_some_and(Path::exists)
}

fn display_or_none(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "None".to_string())
}

/// System turn prepended to every planner call.
pub fn system_prompt(state: &AgentState) -> String {
    format!(
        "{PERSONA}\n\n{TOOL_CATALOG}\n\nCurrently loaded image: {}\nCurrently loaded CSV: {}",
        display_or_none(state.image_path()),
        display_or_none(state.csv_path()),
    )
}
