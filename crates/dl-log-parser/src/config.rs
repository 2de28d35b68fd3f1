//! Viewer configuration, loadable from TOML.

use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;

use crate::error::{LogError, LogResult};
use crate::query::{SortColumn, SortDirection};

/// Settings for reading, paging and displaying a debug log.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Path of the debug log to read.
    pub log_path: String,
    /// Records per page.
    pub per_page: usize,
    /// Rewrite source paths in messages into links.
    pub show_links: bool,
    /// Default sort column when the request names none (or an unknown one).
    pub sort_col: SortColumn,
    /// Default sort direction.
    pub sort_dir: SortDirection,
    /// Installation root whose paths are turned into links. Empty disables links.
    pub root_path: String,
    /// Source-viewer endpoint the links point at.
    pub viewer_url: String,
    /// strftime pattern for displayed timestamps.
    pub date_format: String,
    /// Refuse log files larger than this (0 = unbounded).
    pub max_bytes: u64,
    /// Keep only the last N raw lines (0 = unbounded).
    pub max_lines: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            log_path: "wp-content/debug.log".to_string(),
            per_page: 20,
            show_links: true,
            sort_col: SortColumn::Time,
            sort_dir: SortDirection::Desc,
            root_path: String::new(),
            viewer_url: "view-source.php".to_string(),
            date_format: "%Y %-m. %-d. %H:%M:%S".to_string(),
            max_bytes: 64 * 1024 * 1024,
            max_lines: 0,
        }
    }
}

impl ViewerConfig {
    /// Load and validate config from a TOML file path.
    pub fn from_file(path: &str) -> LogResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| LogError::SourceUnavailable {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate config from TOML text.
    pub fn from_toml(contents: &str) -> LogResult<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| LogError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LogResult<()> {
        if self.per_page == 0 {
            return Err(LogError::InvalidConfig("per_page must be at least 1".into()));
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(LogError::InvalidConfig(format!(
                "invalid date_format '{}'",
                self.date_format
            )));
        }
        Ok(())
    }

    /// Whether returned messages should be link-rewritten.
    pub fn links_enabled(&self) -> bool {
        self.show_links && !self.root_path.is_empty()
    }
}
