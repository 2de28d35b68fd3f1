//! delete_record: remove one record's raw lines from the debug log
//! (confirm-gated).

use async_trait::async_trait;
use serde_json::json;

use crate::config::ViewerConfig;
use crate::error::{LogError, LogResult};
use crate::parser::Parser;
use crate::source::{LogSource, decode_raw_line, split_raw_lines};
use crate::types::{LogTool, ToolResult};

pub struct DeleteRecord;

#[async_trait]
impl LogTool for DeleteRecord {
    fn name(&self) -> &str {
        "delete_record"
    }

    fn description(&self) -> &str {
        "Delete a single record (header and trace lines) from the debug log"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the debug log (configured log_path if omitted)"
                },
                "id": {
                    "type": "integer",
                    "description": "Record id as shown by view_log"
                },
                "confirm": {
                    "type": "boolean",
                    "description": "Must be true to perform the deletion"
                }
            },
            "required": ["id", "confirm"]
        })
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        source: &dyn LogSource,
        config: &ViewerConfig,
    ) -> LogResult<ToolResult> {
        let path = super::path_arg(&args, &config.log_path);
        let id = args["id"]
            .as_u64()
            .ok_or_else(|| LogError::Other("missing 'id' argument".into()))? as usize;

        if !super::confirmed(&args) {
            return Ok(ToolResult::failure(
                "delete_record",
                "deletion not confirmed: pass \"confirm\": true",
            ));
        }

        // Parse with the viewer's settings so ids match what view_log showed.
        let mut parser = Parser::from_source(source, path, config.clone());
        parser.parse().await?;
        let Some(record) = parser.record(id) else {
            return Ok(ToolResult::failure(
                "delete_record",
                format!("no record with id {id} in {path}"),
            ));
        };
        let range = record.line_range();
        let header = parser.raw_lines()[record.line - parser.first_line()].clone();

        // Splice raw bytes so untouched lines keep their exact content and
        // line endings.
        let bytes = source.read_bytes(path).await?;
        let raw = split_raw_lines(&bytes);
        let header_intact = raw
            .get(range.start - 1)
            .is_some_and(|line| decode_raw_line(line) == header);
        if !header_intact || range.end - 1 > raw.len() {
            return Ok(ToolResult::failure(
                "delete_record",
                format!("{path} changed while deleting record {id}; reload and retry"),
            ));
        }
        let kept: Vec<u8> = raw[..range.start - 1]
            .iter()
            .chain(&raw[range.end - 1..])
            .flat_map(|line| line.iter().copied())
            .collect();
        source.write_bytes(path, &kept).await?;
        tracing::info!(path, id, first_line = range.start, line_count = range.len(), "debug log record deleted");

        Ok(ToolResult::success(
            "delete_record",
            json!({
                "path": path,
                "id": id,
                "first_line": range.start,
                "removed_lines": range.len(),
            }),
            format!("Deleted record {id} ({} lines) from {path}", range.len()),
        ))
    }
}
