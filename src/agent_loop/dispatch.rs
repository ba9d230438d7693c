//! Dispatch step: run the requested tool and wrap its output as a tool turn.

use std::sync::Arc;

use tracing::{info, warn};

use crate::tools::validation::validate_arguments;
use crate::tools::{Tool, ToolArguments, ToolExecutionContext};
use crate::types::{AgentToolCall, AgentToolResult, ModelMessage};

/// Looks up tools by name and executes them.
#[derive(Clone)]
pub struct Dispatcher {
    tools: Vec<Arc<dyn Tool>>,
}

impl Dispatcher {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    fn find(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Execute `call` and return the tool turn bound to its id.
    ///
    /// Unknown tools, invalid arguments and tool errors all become
    /// `Error...` text; nothing escapes as a Rust error.
    pub async fn dispatch(&self, call: &AgentToolCall) -> ModelMessage {
        let content = self.run(call).await;
        let is_error = content.starts_with("Error");
        if is_error {
            warn!(tool = %call.name, call_id = %call.id, result = %content, "tool reported an error");
        } else {
            info!(tool = %call.name, call_id = %call.id, "tool completed");
        }
        ModelMessage::tool_result(AgentToolResult {
            tool_call_id: call.id.clone(),
            content,
            is_error,
        })
    }

    async fn run(&self, call: &AgentToolCall) -> String {
        let Some(tool) = self.find(&call.name) else {
            return format!("Error: Tool '{}' not found", call.name);
        };
        let args = ToolArguments::new(call.arguments.clone());
        if let Err(problem) = validate_arguments(args.raw(), &tool.parameters().schema) {
            return format!("Error: invalid arguments for '{}': {problem}", call.name);
        }
        let ctx = ToolExecutionContext {
            tool_call_id: Some(call.id.clone()),
        };
        match tool.execute(&args, &ctx).await {
            Ok(output) => output,
            Err(e) => format!("Error: {e}"),
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field(
                "tools",
                &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
