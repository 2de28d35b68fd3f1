//! delete_log: truncate the whole debug log (confirm-gated).

use async_trait::async_trait;
use serde_json::json;

use crate::config::ViewerConfig;
use crate::error::LogResult;
use crate::source::LogSource;
use crate::types::{LogTool, ToolResult};

pub struct DeleteLog;

#[async_trait]
impl LogTool for DeleteLog {
    fn name(&self) -> &str {
        "delete_log"
    }

    fn description(&self) -> &str {
        "Delete every entry of the debug log by truncating the file"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the debug log (configured log_path if omitted)"
                },
                "confirm": {
                    "type": "boolean",
                    "description": "Must be true to perform the deletion"
                }
            },
            "required": ["confirm"]
        })
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        source: &dyn LogSource,
        config: &ViewerConfig,
    ) -> LogResult<ToolResult> {
        let path = super::path_arg(&args, &config.log_path);

        if !super::confirmed(&args) {
            return Ok(ToolResult::failure(
                "delete_log",
                "deletion not confirmed: pass \"confirm\": true",
            ));
        }
        if !source.exists(path).await {
            return Ok(ToolResult::failure(
                "delete_log",
                format!("debug log not found: {path}"),
            ));
        }

        // The line count is informational; an unreadable log is still truncated.
        let removed_lines = match source.read_lines(path).await {
            Ok(lines) => Some(lines.len()),
            Err(e) => {
                tracing::warn!(path, error = %e, "could not count lines before truncating");
                None
            }
        };
        source.write_bytes(path, &[]).await?;
        tracing::info!(path, removed_lines, "debug log deleted");

        let mut data = json!({ "path": path });
        if let Some(removed_lines) = removed_lines {
            data["removed_lines"] = json!(removed_lines);
        }
        Ok(ToolResult::success(
            "delete_log",
            data,
            format!("Deleted debug log {path}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockLogSource, SAMPLE_LOG_PATH};
    use crate::source::FileLogSource;

    fn config() -> ViewerConfig {
        ViewerConfig {
            log_path: SAMPLE_LOG_PATH.into(),
            ..ViewerConfig::default()
        }
    }

    #[tokio::test]
    async fn requires_confirmation() {
        let source = MockLogSource::with_debug_log_sample();
        let result = DeleteLog.execute(json!({}), &source, &config()).await.unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("confirm"));
        assert_eq!(source.content(SAMPLE_LOG_PATH).unwrap().len(), 14);
    }

    #[tokio::test]
    async fn truncates_when_confirmed() {
        let source = MockLogSource::with_debug_log_sample();
        let result = DeleteLog
            .execute(json!({"confirm": true}), &source, &config())
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.data.as_ref().unwrap()["removed_lines"], 14);
        assert_eq!(source.content(SAMPLE_LOG_PATH), Some(vec![]));
    }

    #[tokio::test]
    async fn oversize_log_is_truncated_without_a_line_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug.log");
        std::fs::write(&path, "[01-Jan-2020 00:00:00 UTC] x\n".repeat(8)).unwrap();
        let path = path.to_str().unwrap();

        let source = FileLogSource::new().with_max_bytes(16);
        let result = DeleteLog
            .execute(json!({"path": path, "confirm": true}), &source, &config())
            .await
            .unwrap();
        assert!(result.success);
        let data = result.data.unwrap();
        assert_eq!(data["path"], path);
        assert!(data.get("removed_lines").is_none());
        assert_eq!(std::fs::metadata(path).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn missing_log_is_a_failure_result() {
        let source = MockLogSource::new();
        let result = DeleteLog
            .execute(json!({"confirm": true}), &source, &config())
            .await
            .unwrap();
        assert!(!result.success);
        assert!(source.content(SAMPLE_LOG_PATH).is_none());
    }
}
