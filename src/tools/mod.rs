//! Tools the planner can call.

pub mod analyze;
pub mod arguments;
pub mod math;
pub mod tool;
pub mod types;
pub mod validation;
pub mod vision;

use std::sync::Arc;

pub use analyze::{analyze_csv, analyze_csv_tool, CsvQuery, ANALYZE_CSV};
pub use arguments::ToolArguments;
pub use math::{divide, divide_tool, DIVIDE};
pub use tool::{AgentTool, Tool, ToolExecutionContext};
pub use types::AgentToolParameters;
pub use vision::{extract_text, ExtractTextTool, EXTRACT_TEXT};

use crate::provider::ModelProvider;

/// Plain-text tool list given to the planner alongside the schemas.
pub const TOOL_CATALOG: &str = "\
- extract_text(image_path: str): Extract text from an image using the vision model.
- analyze_csv(file_path: str, query: str): Analyze a CSV file based on the user's query (e.g., calculate average, summarize data).
- divide(a: float, b: float): Divide a and b - for occasional math calculations.";

/// The standard tool set: text extraction, CSV analysis and division.
pub fn default_tools(vision: Arc<dyn ModelProvider>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ExtractTextTool::new(vision)),
        analyze_csv_tool(),
        divide_tool(),
    ]
}
