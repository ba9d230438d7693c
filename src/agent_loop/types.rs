//! Core run types for the agent loop.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{AgentToolCall, ModelMessage, Role, Usage};

/// Unique run identifier.
pub type RunId = Uuid;

/// Conversation plus the files the current invocation may operate on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub messages: Vec<ModelMessage>,
    /// Image uploaded with this request, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_file: Option<PathBuf>,
    /// CSV file attached to the session, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_csv: Option<PathBuf>,
}

impl AgentState {
    pub fn new(messages: Vec<ModelMessage>) -> Self {
        Self {
            messages,
            input_file: None,
            input_csv: None,
        }
    }

    pub fn with_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_file = Some(path.into());
        self
    }

    pub fn with_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_csv = Some(path.into());
        self
    }

    /// Text of the most recent user turn, or empty if there is none.
    pub fn latest_user_text(&self) -> String {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(ModelMessage::text)
            .unwrap_or_default()
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.input_file.as_deref()
    }

    pub fn csv_path(&self) -> Option<&Path> {
        self.input_csv.as_deref()
    }
}

/// Control loop position.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopState {
    Planning,
    Dispatching(AgentToolCall),
    Done,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The planner produced a turn without a tool request.
    Completed,
    /// The iteration ceiling was hit while tools were still being requested.
    IterationLimit,
}

/// Result of a run: the updated state and bookkeeping.
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    pub run_id: RunId,
    pub state: AgentState,
    pub status: RunStatus,
    /// Planner turns taken.
    pub iterations: usize,
    pub usage: Usage,
}

impl LoopOutcome {
    /// The final turn of the conversation.
    pub fn final_message(&self) -> Option<&ModelMessage> {
        self.state.messages.last()
    }

    /// Text of the final turn, `None` when empty or whitespace.
    pub fn response(&self) -> Option<String> {
        self.final_message()
            .map(ModelMessage::text)
            .filter(|text| !text.trim().is_empty())
    }
}
