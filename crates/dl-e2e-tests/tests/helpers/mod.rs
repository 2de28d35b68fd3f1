//! Shared harness: a real debug log on disk behind the viewer registry.

#![allow(dead_code)]

use std::path::PathBuf;

use dl_log_parser::{FileLogSource, LogResult, ToolResult, ViewerConfig};
use dl_viewer::registry::ToolRegistry;
use tempfile::TempDir;

pub const SAMPLE_LOG: &str = "\
[15-Jan-2024 12:00:01 UTC] PHP Notice:  Undefined index: page in /srv/wp/wp-content/plugins/shop/admin.php on line 42
[15-Jan-2024 12:01:10 UTC] PHP Fatal error:  Uncaught Error: Call to undefined function shop_init() in /srv/wp/wp-content/plugins/shop/shop.php:27
Stack trace:
#0 /srv/wp/wp-includes/class-wp-hook.php(324): shop_boot('')
#1 {main}
  thrown in /srv/wp/wp-content/plugins/shop/shop.php on line 27
[16-Jan-2024 08:30:00 UTC] PHP Warning:  Division by zero in /srv/wp/wp-content/themes/base/functions.php on line 7
[31-Feb-2024 08:31:00 UTC] PHP Notice:  impossible date
[16-Jan-2024 09:00:00 UTC] Log Parser error: unable to read rotated log
[17-Jan-2024 10:15:00 UTC] PHP Parse error:  syntax error, unexpected '}' in /srv/wp/wp-content/themes/base/header.php on line 9
";

pub struct TestHarness {
    pub dir: TempDir,
    pub log_path: PathBuf,
    pub config: ViewerConfig,
    pub source: FileLogSource,
    pub registry: ToolRegistry,
}

impl TestHarness {
    pub fn with_log(content: &str) -> Self {
        Self::with_log_bytes(content.as_bytes())
    }

    pub fn with_log_bytes(content: &[u8]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("debug.log");
        std::fs::write(&log_path, content).unwrap();

        let config_path = dir.path().join("viewer.toml");
        std::fs::write(
            &config_path,
            format!(
                "log_path = {:?}\nper_page = 2\nroot_path = \"/srv/wp/\"\nviewer_url = \"source.php\"\n",
                log_path.to_str().unwrap()
            ),
        )
        .unwrap();
        let config = ViewerConfig::from_file(config_path.to_str().unwrap()).unwrap();

        Self {
            dir,
            log_path,
            source: FileLogSource::new().with_max_bytes(config.max_bytes),
            config,
            registry: ToolRegistry::with_defaults(),
        }
    }

    pub fn with_sample() -> Self {
        Self::with_log(SAMPLE_LOG)
    }

    pub async fn run(&self, tool: &str, args: serde_json::Value) -> LogResult<ToolResult> {
        self.registry
            .dispatch(tool, args, &self.source, &self.config)
            .await
    }

    pub fn log_content(&self) -> String {
        std::fs::read_to_string(&self.log_path).unwrap()
    }

    pub fn log_bytes(&self) -> Vec<u8> {
        std::fs::read(&self.log_path).unwrap()
    }
}
