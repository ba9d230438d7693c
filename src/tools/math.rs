//! Arithmetic for the occasional calculation.

use std::sync::Arc;

use tracing::{error, info};

use super::tool::{AgentTool, Tool, ToolExecutionContext};
use super::types::AgentToolParameters;
use crate::table::format_float;

pub const DIVIDE: &str = "divide";

/// Divide `a` by `b`. Division by zero yields an error string instead.
pub fn divide(a: f64, b: f64) -> String {
    info!(a, b, "divide");
    if b == 0.0 {
        error!("Division by zero attempted");
        return "Error: Division by zero".to_string();
    }
    format_float(a / b)
}

/// The `divide(a, b)` tool.
pub fn divide_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        DIVIDE,
        "Divide a and b - for occasional math calculations",
        AgentToolParameters::object()
            .number("a", "Dividend", true)
            .number("b", "Divisor", true)
            .build(),
        |args, _ctx: ToolExecutionContext| async move {
            let a = args.get_f64("a")?;
            let b = args.get_f64("b")?;
            Ok(divide(a, b))
        },
    ))
}
