//! Conversation turns exchanged with the model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single turn in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ModelMessage {
    fn with_parts(role: Role, content: Vec<ContentPart>) -> Self {
        Self {
            role,
            content,
            timestamp: Some(Utc::now()),
        }
    }

    /// Create a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self::with_parts(Role::System, vec![ContentPart::Text { text: text.into() }])
    }

    /// Create a user (human) message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_parts(Role::User, vec![ContentPart::Text { text: text.into() }])
    }

    /// Create an assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::with_parts(Role::Assistant, vec![ContentPart::Text { text: text.into() }])
    }

    /// Create an assistant message that requests a tool call.
    ///
    /// Text is dropped when empty so providers see a pure tool-call turn.
    pub fn assistant_tool_call(text: impl Into<String>, call: AgentToolCall) -> Self {
        let text = text.into();
        let mut content = Vec::with_capacity(2);
        if !text.is_empty() {
            content.push(ContentPart::Text { text });
        }
        content.push(ContentPart::ToolCall(call));
        Self::with_parts(Role::Assistant, content)
    }

    /// Create a tool result message bound to the call that produced it.
    pub fn tool_result(result: AgentToolResult) -> Self {
        Self::with_parts(Role::Tool, vec![ContentPart::ToolResult(result)])
    }

    /// Create a user message with an attached image.
    pub fn user_with_image(
        text: impl Into<String>,
        image_data: String,
        mime_type: impl Into<String>,
    ) -> Self {
        Self::with_parts(
            Role::User,
            vec![
                ContentPart::Text { text: text.into() },
                ContentPart::Image(ImageContent {
                    data: image_data,
                    mime_type: mime_type.into(),
                }),
            ],
        )
    }

    /// Textual content of the turn.
    ///
    /// Tool results contribute their output so that a tool turn reads the same
    /// way the model sees it.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::ToolResult(result) => Some(result.content.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// Tool calls requested by this turn.
    pub fn tool_calls(&self) -> Vec<&AgentToolCall> {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::ToolCall(tc) => Some(tc),
                _ => None,
            })
            .collect()
    }
}

/// Conversation role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A single part of message content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    Image(ImageContent),
    ToolCall(AgentToolCall),
    ToolResult(AgentToolResult),
}

/// Base64 image embedded in a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageContent {
    pub data: String,
    pub mime_type: String,
}

impl ImageContent {
    /// `data:` URL form accepted by vision endpoints.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// Textual outcome of a dispatched tool call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentToolResult {
    pub tool_call_id: String,
    pub content: String,
    #[serde(default)]
    pub is_error: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call() -> AgentToolCall {
        AgentToolCall {
            id: "call_1".into(),
            name: "divide".into(),
            arguments: serde_json::json!({"a": 6, "b": 3}),
        }
    }

    #[test]
    fn assistant_tool_call_without_text_has_single_part() {
        let msg = ModelMessage::assistant_tool_call("", call());
        assert_eq!(msg.content.len(), 1);
        assert_eq!(msg.tool_calls()[0].name, "divide");
    }

    #[test]
    fn tool_result_text_is_its_content() {
        let msg = ModelMessage::tool_result(AgentToolResult {
            tool_call_id: "call_1".into(),
            content: "2.0".into(),
            is_error: false,
        });
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.text(), "2.0");
        assert!(msg.tool_calls().is_empty());
    }

    #[test]
    fn image_data_url() {
        let img = ImageContent {
            data: "QUJD".into(),
            mime_type: "image/png".into(),
        };
        assert_eq!(img.data_url(), "data:image/png;base64,QUJD");
    }

    #[test]
    fn roundtrips_through_json_with_tagged_parts() {
        let msg = ModelMessage::assistant_tool_call("thinking", call());
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"][1]["type"], "tool_call");
        let back: ModelMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
    }
}
