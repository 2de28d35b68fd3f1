//! Debug log parsing for PHP/WordPress-style `debug.log` files.
//!
//! Reconstructs multi-line log records (an entry header plus its `#n` stack
//! frames), classifies them by message prefix, and serves them as a
//! filterable, sortable, paginated collection. Also provides link rewriting
//! for display, a stats aggregator, a `LogSource` abstraction for
//! testability, and 4 tools: view_log, log_stats, delete_log, delete_record.

pub mod classifier;
pub mod config;
pub mod error;
pub mod links;
pub mod mock;
pub mod parser;
pub mod query;
pub mod reconstructor;
pub mod source;
pub mod stats;
pub mod tools;
pub mod types;

// Re-export key types for convenience
pub use config::ViewerConfig;
pub use error::{LogError, LogResult};
pub use links::LinkRewriter;
pub use mock::MockLogSource;
pub use parser::{Page, Parser};
pub use query::{FilterCriteria, QueryParams, SortColumn, SortDirection};
pub use source::{FileLogSource, LogSource};
pub use stats::Stats;
pub use types::{LogTool, Period, Record, RecordType, RecordView, ToolResult};
