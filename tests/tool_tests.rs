//! Tests for the tool set as the planner sees it.

mod common;

use std::path::Path;
use std::sync::Arc;

use alfred::tools::*;
use alfred::types::Role;
use common::{write_file, MockProvider, PEOPLE_CSV};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn default_tools_are_named_for_the_planner() {
    let tools = default_tools(Arc::new(MockProvider::new("vision")));
    let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["extract_text", "analyze_csv", "divide"]);
    for tool in &tools {
        assert_eq!(tool.parameters().schema["type"], "object");
        assert!(TOOL_CATALOG.contains(tool.name()));
    }
}

#[test]
fn divide_never_panics_on_zero() {
    assert_eq!(divide(42.0, 0.0), "Error: Division by zero");
    assert_eq!(divide(1.0, 3.0), "0.3333333333333333");
}

#[test]
fn analyze_csv_average_contains_mean() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "people.csv", PEOPLE_CSV.as_bytes());
    assert_eq!(analyze_csv(&csv, "average of column Age"), "Average of Age: 35.0");
    assert_eq!(analyze_csv(&csv, "Mean of column Score"), "Average of Score: 2.5");
}

#[test]
fn analyze_csv_summary_is_a_statistics_table() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "people.csv", PEOPLE_CSV.as_bytes());
    let expected = [
        "Data Summary:",
        "             Age     Score",
        "count   4.000000  4.000000",
        "mean   35.000000  2.500000",
        "std    12.909944  1.290994",
        "min    20.000000  1.000000",
        "25%    27.500000  1.750000",
        "50%    35.000000  2.500000",
        "75%    42.500000  3.250000",
        "max    50.000000  4.000000",
    ]
    .join("\n");
    assert_eq!(analyze_csv(&csv, "summarize data"), expected);
}

#[test]
fn missing_files_are_reported_without_reading() {
    let missing = Path::new("/definitely/not/here.csv");
    assert_eq!(analyze_csv(missing, "summarize"), "Error: CSV file not found");
}

#[tokio::test]
async fn extract_text_missing_file_does_not_call_model() {
    let provider = MockProvider::new("vision");
    let out = extract_text(&provider, Path::new("/definitely/not/here.png")).await;
    assert_eq!(out, "Error: Image file not found");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn extract_text_tool_sends_one_multimodal_message() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_file(dir.path(), "receipt.png", b"\x89PNG\r\n\x1a\nfake");
    let provider = Arc::new(MockProvider::new("vision"));
    provider.queue_response("TOTAL 12.50\n");

    let tool = ExtractTextTool::new(provider.clone());
    let out = tool
        .execute(
            &ToolArguments::new(json!({"image_path": image.to_str().unwrap()})),
            &ToolExecutionContext::default(),
        )
        .await
        .unwrap();

    assert_eq!(out, "TOTAL 12.50");
    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].messages.len(), 1);
    assert_eq!(requests[0].messages[0].role, Role::User);
}

#[tokio::test]
async fn closure_tool_receives_call_context() {
    let tool = AgentTool::new(
        "echo_id",
        "Echo the call id",
        AgentToolParameters::object().build(),
        |_args, ctx: ToolExecutionContext| async move {
            Ok(ctx.tool_call_id.unwrap_or_default())
        },
    );
    let ctx = ToolExecutionContext {
        tool_call_id: Some("call_9".into()),
    };
    let out = tool.execute(&ToolArguments::new(json!({})), &ctx).await.unwrap();
    assert_eq!(out, "call_9");
}
