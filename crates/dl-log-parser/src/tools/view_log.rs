//! view_log: one sorted, filtered page of debug log records.

use async_trait::async_trait;
use serde_json::json;

use crate::config::ViewerConfig;
use crate::error::LogResult;
use crate::parser::Parser;
use crate::query::{FilterCriteria, QueryParams};
use crate::source::LogSource;
use crate::types::{LogTool, ToolResult};

pub struct ViewLog;

/// Read a query parameter given either as a string or a number.
fn param(args: &serde_json::Value, key: &str) -> Option<String> {
    match &args[key] {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl LogTool for ViewLog {
    fn name(&self) -> &str {
        "view_log"
    }

    fn description(&self) -> &str {
        "Show one page of debug log records, sorted and optionally filtered"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the debug log (configured log_path if omitted)"
                },
                "page": {
                    "type": "integer",
                    "description": "1-based page number (default: 1)"
                },
                "orderby": {
                    "type": "string",
                    "enum": ["id", "time", "text", "type"],
                    "description": "Sort column (configured default if omitted)"
                },
                "order": {
                    "type": "string",
                    "enum": ["asc", "desc"],
                    "description": "Sort direction (configured default if omitted)"
                },
                "type": {
                    "type": "string",
                    "description": "Only records of this type (label or key)"
                },
                "since": {
                    "type": "string",
                    "description": "Only records at or after this RFC 3339 time or YYYY-MM-DD date"
                },
                "until": {
                    "type": "string",
                    "description": "Only records before this RFC 3339 time or YYYY-MM-DD date"
                },
                "period": {
                    "type": "string",
                    "enum": ["today", "yesterday", "earlier", "all"],
                    "description": "Only records in this calendar bucket"
                },
                "now": {
                    "type": "string",
                    "description": "Reference time for 'period' (default: current time)"
                }
            }
        })
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        source: &dyn LogSource,
        config: &ViewerConfig,
    ) -> LogResult<ToolResult> {
        let path = super::path_arg(&args, &config.log_path);
        let now = super::now_arg(&args)?;

        let params = QueryParams {
            order: param(&args, "order"),
            orderby: param(&args, "orderby"),
            page: param(&args, "page"),
        };
        let query = params.resolve(config);

        let filter_pairs: Vec<(&str, &str)> = ["type", "since", "until", "period"]
            .into_iter()
            .filter_map(|key| args[key].as_str().map(|value| (key, value)))
            .collect();
        let criteria = FilterCriteria::from_pairs(filter_pairs, now);

        let mut parser = Parser::from_source(source, path, config.clone());
        parser.filter(criteria.clone()).await?;
        let page = parser.page(query).await?;

        let shown = page.records.len();
        let summary = format!(
            "Page {} of {}: {shown} of {} records from {path}",
            page.page,
            page.total_pages.max(1),
            page.total_items
        );
        let data = json!({
            "path": path,
            "total_records": parser.total_count(),
            "malformed_lines": parser.anomalies().len(),
            "filter": criteria,
            "page": page,
        });

        Ok(ToolResult::success("view_log", data, summary))
    }
}
