//! Convenience re-exports for common use.

pub use crate::agent_loop::{AgentLoop, AgentState, LoopOutcome, RunStatus};
pub use crate::config::AlfredConfig;
pub use crate::error::{AlfredError, Result};
pub use crate::provider::{create_provider, ModelProvider, ModelRole};
pub use crate::tools::{default_tools, AgentTool, AgentToolParameters, Tool, ToolArguments};
pub use crate::types::{ContentPart, GenerationSettings, ModelMessage, Role, Usage};
