//! Averages and summaries over an uploaded CSV file.

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use super::tool::{AgentTool, Tool, ToolExecutionContext};
use super::types::AgentToolParameters;
use crate::error::AlfredError;
use crate::table::{describe, format_float, Table, TableError};

pub const ANALYZE_CSV: &str = "analyze_csv";

const UNSUPPORTED_QUERY: &str =
    "Error: Unsupported CSV query. Try 'average of column X' or 'summarize data'";

/// What the caller asked of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvQuery {
    /// Mean of the named column (possibly empty when no column was named).
    Average(String),
    Summary,
    Unsupported,
}

impl CsvQuery {
    /// Classify a free-text query, case-insensitively.
    ///
    /// The column name is whatever follows the last occurrence of the word
    /// `column`, trimmed.
    pub fn parse(query: &str) -> Self {
        // ASCII lowering keeps byte offsets aligned with `query`.
        let lower = query.to_ascii_lowercase();
        if lower.contains("average") || lower.contains("mean") {
            let column = lower
                .rfind("column")
                .map(|idx| query[idx + "column".len()..].trim().to_string())
                .unwrap_or_default();
            Self::Average(column)
        } else if lower.contains("summarize") || lower.contains("summary") {
            Self::Summary
        } else {
            Self::Unsupported
        }
    }
}

/// Run `query` against the CSV at `path`. Every failure is returned as text.
pub fn analyze_csv(path: &Path, query: &str) -> String {
    info!(path = %path.display(), query, "analyze_csv");
    if !path.exists() {
        error!(path = %path.display(), "CSV file not found");
        return "Error: CSV file not found".to_string();
    }

    let table = match Table::from_path(path) {
        Ok(table) => table,
        Err(TableError::Empty) => {
            error!(path = %path.display(), "Invalid CSV: empty or no columns");
            return "Error: Invalid CSV file (empty or no columns)".to_string();
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Invalid CSV format");
            return format!("Error: Invalid CSV format: {e}");
        }
    };

    match CsvQuery::parse(query) {
        CsvQuery::Average(column) => match table.mean(&column) {
            Ok(avg) => format!("Average of {column}: {}", format_float(avg)),
            Err(e) => format!("Error: {e}"),
        },
        CsvQuery::Summary => format!("Data Summary:\n{}", describe(&table)),
        CsvQuery::Unsupported => UNSUPPORTED_QUERY.to_string(),
    }
}

/// The `analyze_csv(file_path, query)` tool.
pub fn analyze_csv_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        ANALYZE_CSV,
        "Analyze a CSV file based on the user's query (e.g., calculate average, summarize data)",
        AgentToolParameters::object()
            .string("file_path", "Path to the CSV file", true)
            .string(
                "query",
                "Either 'average of column <name>' or 'summarize data'",
                true,
            )
            .build(),
        |args, _ctx: ToolExecutionContext| async move {
            let path = args.get_str("file_path")?.to_string();
            let query = args.get_str("query")?.to_string();
            // The blocking pool does not inherit the caller's span.
            let span = tracing::Span::current();
            tokio::task::spawn_blocking(move || {
                span.in_scope(|| analyze_csv(Path::new(&path), &query))
            })
            .await
            .map_err(|e| AlfredError::ToolExecution {
                tool_name: ANALYZE_CSV.into(),
                message: e.to_string(),
            })
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_average_queries() {
        assert_eq!(
            CsvQuery::parse("average of column Age"),
            CsvQuery::Average("Age".into())
        );
        assert_eq!(
            CsvQuery::parse("What is the MEAN of Column Salary "),
            CsvQuery::Average("Salary".into())
        );
        assert_eq!(CsvQuery::parse("average please"), CsvQuery::Average(String::new()));
        assert_eq!(CsvQuery::parse("Summarize data"), CsvQuery::Summary);
        assert_eq!(CsvQuery::parse("give me a summary"), CsvQuery::Summary);
        assert_eq!(CsvQuery::parse("plot it"), CsvQuery::Unsupported);
    }

    #[test]
    fn average_of_column() {
        let file = csv_file("Name,Age\nAlice,30\nBob,41\n");
        assert_eq!(analyze_csv(file.path(), "average of column Age"), "Average of Age: 35.5");
    }

    #[test]
    fn average_skips_missing_cells() {
        let file = csv_file("Name,Age\nAlice,30\nBob,NA\nCarol,nan\nDan,null\nEve,40\n");
        assert_eq!(analyze_csv(file.path(), "average of column Age"), "Average of Age: 35.0");
    }

    #[test]
    fn summary_skips_missing_cells() {
        let file = csv_file("Name,Age\nAlice,30\nBob,NA\nCarol,40\n");
        let out = analyze_csv(file.path(), "summarize data");
        let count = out.lines().find(|l| l.starts_with("count")).unwrap();
        assert_eq!(count.split_whitespace().collect::<Vec<_>>(), ["count", "2.000000"]);
        assert!(!out.contains("unique"));
    }

    #[test]
    fn column_name_follows_last_column_keyword() {
        assert_eq!(
            CsvQuery::parse("average of column Sales column"),
            CsvQuery::Average(String::new())
        );
        assert_eq!(
            CsvQuery::parse("mean of the column column Total"),
            CsvQuery::Average("Total".into())
        );
        let file = csv_file("Sales\n1\n");
        assert_eq!(
            analyze_csv(file.path(), "average of column Sales column"),
            "Error: Column not found"
        );
    }

    #[test]
    fn average_of_unknown_column() {
        let file = csv_file("Name,Age\nAlice,30\n");
        assert_eq!(
            analyze_csv(file.path(), "average of column Height"),
            "Error: Column not found"
        );
        assert_eq!(analyze_csv(file.path(), "average"), "Error: Column not found");
    }

    #[test]
    fn average_of_text_column() {
        let file = csv_file("Name,Age\nAlice,30\n");
        assert_eq!(
            analyze_csv(file.path(), "mean of column Name"),
            "Error: Column 'Name' has no numeric values"
        );
    }

    #[test]
    fn summary_contains_statistics() {
        let file = csv_file("Name,Age\nAlice,30\nBob,40\n");
        let out = analyze_csv(file.path(), "summarize");
        assert!(out.starts_with("Data Summary:\n"));
        assert!(out.contains("Age"));
        assert!(out.contains("mean"));
        assert!(out.contains("35.000000"));
    }

    #[test]
    fn missing_file() {
        assert_eq!(
            analyze_csv(Path::new("/nonexistent/data.csv"), "summarize"),
            "Error: CSV file not found"
        );
    }

    #[test]
    fn header_only_file() {
        let file = csv_file("Name,Age\n");
        assert_eq!(
            analyze_csv(file.path(), "summarize"),
            "Error: Invalid CSV file (empty or no columns)"
        );
    }

    #[test]
    fn blank_file() {
        let file = csv_file("");
        assert_eq!(
            analyze_csv(file.path(), "summarize"),
            "Error: Invalid CSV format: No columns to parse from file"
        );
    }

    #[test]
    fn unsupported_query() {
        let file = csv_file("a\n1\n");
        assert_eq!(analyze_csv(file.path(), "plot a histogram"), UNSUPPORTED_QUERY);
    }

    #[tokio::test]
    async fn tool_runs_off_the_async_runtime() {
        let file = csv_file("Score\n1\n2\n");
        let args = crate::tools::ToolArguments::new(serde_json::json!({
            "file_path": file.path().to_str().unwrap(),
            "query": "average of column Score",
        }));
        let out = analyze_csv_tool()
            .execute(&args, &ToolExecutionContext::default())
            .await
            .unwrap();
        assert_eq!(out, "Average of Score: 1.5");
    }
}
