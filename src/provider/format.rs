//! Wire formatting helpers for the Chat Completions API.

use serde_json::{json, Value};

use crate::types::{AgentToolCall, ContentPart, ModelMessage, Role};

fn role_name(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    }
}

/// Tool-call arguments travel as a JSON-encoded string.
fn arguments_to_string(arguments: &Value) -> String {
    match arguments {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    }
}

fn tool_call_to_openai(tc: &AgentToolCall) -> Value {
    json!({
        "id": tc.id,
        "type": "function",
        "function": {
            "name": tc.name,
            "arguments": arguments_to_string(&tc.arguments),
        }
    })
}

/// Convert one conversation turn into a Chat Completions message.
pub(crate) fn message_to_openai(msg: &ModelMessage) -> Value {
    let role = role_name(msg.role);

    if let [ContentPart::ToolResult(tr)] = msg.content.as_slice() {
        return json!({
            "role": "tool",
            "tool_call_id": tr.tool_call_id,
            "content": tr.content,
        });
    }

    let tool_calls = msg.tool_calls();
    if !tool_calls.is_empty() {
        let text = msg.text();
        return json!({
            "role": role,
            "content": if text.is_empty() { Value::Null } else { Value::String(text) },
            "tool_calls": tool_calls.into_iter().map(tool_call_to_openai).collect::<Vec<_>>(),
        });
    }

    if let [ContentPart::Text { text }] = msg.content.as_slice() {
        return json!({ "role": role, "content": text });
    }

    let parts: Vec<Value> = msg
        .content
        .iter()
        .filter_map(|part| match part {
            ContentPart::Text { text } => Some(json!({ "type": "text", "text": text })),
            ContentPart::Image(img) => Some(json!({
                "type": "image_url",
                "image_url": { "url": img.data_url() }
            })),
            // Tool calls and results are handled at message level above.
            ContentPart::ToolCall(_) | ContentPart::ToolResult(_) => None,
        })
        .collect();

    json!({ "role": role, "content": parts })
}

/// Parse the `arguments` string of a returned tool call.
///
/// Malformed JSON is kept as a raw string so dispatch can report it.
pub(crate) fn parse_arguments(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return json!({});
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
