//! Log source abstraction: read and rewrite debug logs on disk or in memory.

use async_trait::async_trait;

use crate::error::{LogError, LogResult};

/// Abstraction over where a debug log lives.
///
/// Parsing reads decoded lines; the delete tools work on raw bytes so that
/// lines they do not remove are written back unchanged.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Read the raw content of `path`.
    async fn read_bytes(&self, path: &str) -> LogResult<Vec<u8>>;

    /// Replace the whole content of `path` with `bytes`.
    async fn write_bytes(&self, path: &str, bytes: &[u8]) -> LogResult<()>;

    /// Check if a source path exists and is readable.
    async fn exists(&self, path: &str) -> bool;

    /// Read all lines, decoding invalid UTF-8 lossily.
    async fn read_lines(&self, path: &str) -> LogResult<Vec<String>> {
        let bytes = self.read_bytes(path).await?;
        Ok(decode_lines(&bytes))
    }
}

/// Split raw content into lines, decoding invalid UTF-8 lossily.
///
/// Debug logs may carry stray non-UTF-8 bytes from dumped request data.
pub fn decode_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(String::from)
        .collect()
}

/// Split raw content into lines, each keeping its `\n` terminator.
///
/// Yields the same number of lines as `decode_lines` on the same input.
pub fn split_raw_lines(bytes: &[u8]) -> Vec<&[u8]> {
    bytes.split_inclusive(|&b| b == b'\n').collect()
}

/// Decode one raw line the way `decode_lines` would present it.
pub fn decode_raw_line(raw: &[u8]) -> String {
    let raw = match raw.strip_suffix(b"\n") {
        Some(line) => line.strip_suffix(b"\r").unwrap_or(line),
        None => raw,
    };
    String::from_utf8_lossy(raw).into_owned()
}

/// Reads debug logs from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FileLogSource {
    /// Refuse files larger than this many bytes (0 = unbounded).
    max_bytes: u64,
}

impl FileLogSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the size of files this source will read.
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

fn unavailable(path: &str, e: std::io::Error) -> LogError {
    LogError::SourceUnavailable {
        path: path.to_string(),
        reason: e.to_string(),
    }
}

#[async_trait]
impl LogSource for FileLogSource {
    async fn read_bytes(&self, path: &str) -> LogResult<Vec<u8>> {
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| unavailable(path, e))?;
        if self.max_bytes > 0 && meta.len() > self.max_bytes {
            tracing::warn!(path, bytes = meta.len(), limit = self.max_bytes, "refusing oversize log");
            return Err(LogError::SourceTooLarge {
                path: path.to_string(),
                bytes: meta.len(),
                limit: self.max_bytes,
            });
        }
        tokio::fs::read(path).await.map_err(|e| unavailable(path, e))
    }

    async fn write_bytes(&self, path: &str, bytes: &[u8]) -> LogResult<()> {
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| LogError::Io(format!("{path}: {e}")))
    }

    async fn exists(&self, path: &str) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}
