//! Mock log source for testing: serves pre-loaded log content.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{LogError, LogResult};
use crate::source::{LogSource, decode_lines};

/// Path used by the sample fixtures.
pub const SAMPLE_LOG_PATH: &str = "/var/www/html/wp-content/debug.log";

/// A mock log source that serves pre-loaded content by path.
///
/// Content is held as raw bytes. Writes replace it, so delete tools can be
/// verified by reading the path back.
pub struct MockLogSource {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MockLogSource {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
        }
    }

    /// Add a file with the given lines, each terminated by `\n`.
    pub fn add_file(&mut self, path: impl Into<String>, lines: Vec<String>) {
        let mut bytes = Vec::new();
        for line in lines {
            bytes.extend_from_slice(line.as_bytes());
            bytes.push(b'\n');
        }
        self.add_file_bytes(path, bytes);
    }

    /// Add a file with exact raw content.
    pub fn add_file_bytes(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(path.into(), bytes.into());
    }

    /// Current content of a file as decoded lines, if present.
    pub fn content(&self, path: &str) -> Option<Vec<String>> {
        self.lock().get(path).map(|bytes| decode_lines(bytes))
    }

    /// Current raw content of a file, if present.
    pub fn content_bytes(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().get(path).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.files
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create a mock with a sample WordPress debug log at `SAMPLE_LOG_PATH`.
    ///
    /// Eight records: two fatal errors with traces, two warnings, two
    /// notices, one parse error and one untyped database error.
    pub fn with_debug_log_sample() -> Self {
        let mut m = Self::new();
        m.add_file(
            SAMPLE_LOG_PATH,
            vec![
                "[15-Jan-2024 12:00:01 UTC] PHP Notice:  Undefined index: page in /var/www/html/wp-content/plugins/shop/admin.php on line 42".into(),
                "[15-Jan-2024 12:00:05 UTC] PHP Warning:  Invalid argument supplied for foreach() in /var/www/html/wp-content/themes/base/functions.php on line 118".into(),
                "[15-Jan-2024 12:01:10 UTC] PHP Fatal error:  Uncaught Error: Call to undefined function shop_init() in /var/www/html/wp-content/plugins/shop/shop.php:27".into(),
                "Stack trace:".into(),
                "#0 /var/www/html/wp-includes/class-wp-hook.php(324): shop_boot('')".into(),
                "#1 /var/www/html/wp-includes/plugin.php(517): WP_Hook->do_action(Array)".into(),
                "#2 {main}".into(),
                "  thrown in /var/www/html/wp-content/plugins/shop/shop.php on line 27".into(),
                "[15-Jan-2024 12:02:00 UTC] WordPress database error Table 'wp.wp_shop' doesn't exist for query SELECT * FROM wp_shop".into(),
                "[16-Jan-2024 08:30:00 UTC] PHP Parse error:  syntax error, unexpected '}' in /var/www/html/wp-content/themes/base/header.php on line 9".into(),
                "[16-Jan-2024 08:31:00 UTC] PHP Notice:  Trying to get property 'ID' of non-object in /var/www/html/wp-content/themes/base/single.php on line 14".into(),
                "[16-Jan-2024 09:00:00 UTC] PHP Warning:  file_get_contents(/tmp/cache.json): failed to open stream".into(),
                "[17-Jan-2024 10:15:00 UTC] PHP Fatal error:  Allowed memory size of 134217728 bytes exhausted in /var/www/html/wp-includes/functions.php on line 5231".into(),
                "#0 {main}".into(),
            ],
        );
        m
    }
}

impl Default for MockLogSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogSource for MockLogSource {
    async fn read_bytes(&self, path: &str) -> LogResult<Vec<u8>> {
        self.content_bytes(path).ok_or_else(|| LogError::SourceUnavailable {
            path: path.to_string(),
            reason: "no such file".into(),
        })
    }

    async fn write_bytes(&self, path: &str, bytes: &[u8]) -> LogResult<()> {
        self.lock().insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        self.lock().contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_read_lines() {
        let source = MockLogSource::with_debug_log_sample();
        let lines = source.read_lines(SAMPLE_LOG_PATH).await.unwrap();
        assert_eq!(lines.len(), 14);
    }

    #[tokio::test]
    async fn mock_not_found() {
        let source = MockLogSource::new();
        let result = source.read_lines("/nonexistent").await;
        assert!(matches!(result, Err(LogError::SourceUnavailable { .. })));
    }

    #[tokio::test]
    async fn mock_write_replaces_content() {
        let source = MockLogSource::with_debug_log_sample();
        source.write_bytes(SAMPLE_LOG_PATH, &[]).await.unwrap();
        assert_eq!(source.content(SAMPLE_LOG_PATH), Some(vec![]));
        assert_eq!(source.content_bytes(SAMPLE_LOG_PATH), Some(vec![]));
    }

    #[tokio::test]
    async fn mock_exists() {
        let source = MockLogSource::with_debug_log_sample();
        assert!(source.exists(SAMPLE_LOG_PATH).await);
        assert!(!source.exists("/nonexistent").await);
    }

    #[tokio::test]
    async fn mock_keeps_raw_bytes() {
        let mut source = MockLogSource::new();
        source.add_file_bytes("/log", &b"a\r\nb \xff\n"[..]);
        assert_eq!(source.read_bytes("/log").await.unwrap(), b"a\r\nb \xff\n");
        let lines = source.read_lines("/log").await.unwrap();
        assert_eq!(lines, vec!["a".to_string(), "b \u{FFFD}".to_string()]);
    }
}
