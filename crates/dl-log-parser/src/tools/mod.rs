//! Debug log tools, dispatched by name with JSON arguments.

pub mod delete_log;
pub mod delete_record;
pub mod log_stats;
pub mod view_log;

use chrono::{DateTime, Utc};

use crate::error::{LogError, LogResult};
use crate::types::LogTool;

/// Every tool this crate provides.
pub fn all_tools() -> Vec<Box<dyn LogTool>> {
    vec![
        Box::new(view_log::ViewLog),
        Box::new(log_stats::LogStats),
        Box::new(delete_log::DeleteLog),
        Box::new(delete_record::DeleteRecord),
    ]
}

/// Reference time for period buckets: the `now` argument, or the clock.
fn now_arg(args: &serde_json::Value) -> LogResult<DateTime<Utc>> {
    match args["now"].as_str() {
        None => Ok(Utc::now()),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| LogError::Other(format!("invalid 'now' argument: {e}"))),
    }
}

/// Log path from the `path` argument, defaulting to the configured one.
fn path_arg<'a>(args: &'a serde_json::Value, default: &'a str) -> &'a str {
    args["path"].as_str().unwrap_or(default)
}

/// Whether a destructive call carries `"confirm": true`.
fn confirmed(args: &serde_json::Value) -> bool {
    args["confirm"].as_bool().unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_names_are_unique() {
        let tools = all_tools();
        let mut names: Vec<_> = tools.iter().map(|t| t.name().to_string()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), tools.len());
    }

    #[test]
    fn now_argument() {
        let now = now_arg(&json!({"now": "2024-01-17T18:00:00Z"})).unwrap();
        assert_eq!(now.to_rfc3339(), "2024-01-17T18:00:00+00:00");
        assert!(now_arg(&json!({"now": "yesterday"})).is_err());
        assert!(now_arg(&json!({})).is_ok());
    }

    #[test]
    fn confirmation_must_be_true() {
        assert!(confirmed(&json!({"confirm": true})));
        assert!(!confirmed(&json!({"confirm": "yes"})));
        assert!(!confirmed(&json!({})));
    }
}
