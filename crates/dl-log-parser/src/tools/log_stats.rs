//! log_stats: record counts by type and by period.

use async_trait::async_trait;
use serde_json::json;

use crate::config::ViewerConfig;
use crate::error::LogResult;
use crate::parser::Parser;
use crate::source::LogSource;
use crate::types::{LogTool, RecordType, ToolResult};

pub struct LogStats;

#[async_trait]
impl LogTool for LogStats {
    fn name(&self) -> &str {
        "log_stats"
    }

    fn description(&self) -> &str {
        "Count debug log records by type and by period (today, yesterday, earlier)"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the debug log (configured log_path if omitted)"
                },
                "now": {
                    "type": "string",
                    "description": "Reference time for period buckets (default: current time)"
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

        let mut parser = Parser::from_source(source, path, config.clone());
        parser.prepare().await?;
        let total_lines = parser.total_count();
        let stats = parser.stats(now).await?;

        let errors = stats.get_count_by_type(RecordType::FatalError.key())
            + stats.get_count_by_type(RecordType::ParseError.key());
        let mut data = stats.to_json();
        data["path"] = json!(path);
        data["total_lines"] = json!(total_lines);
        data["malformed_lines"] = json!(parser.anomalies().len());

        Ok(ToolResult::success(
            "log_stats",
            data,
            format!(
                "{} records: {errors} fatal/parse errors, {} today, from {path}",
                stats.total_count(),
                stats.get_count_by_period("today")
            ),
        ))
    }
}
