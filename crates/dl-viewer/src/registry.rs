//! Tool registry for the viewer.
//!
//! Looks up debug log tools by name when dispatching an invocation.

use std::collections::HashMap;

use dl_log_parser::{LogResult, LogSource, LogTool, ToolResult, ViewerConfig};

/// Metadata about a registered tool (used by `--list`).
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub schema: serde_json::Value,
}

/// Registry of debug log tools, indexed by name.
pub struct ToolRegistry {
    tools: Vec<Box<dyn LogTool>>,
    /// Map from tool name → index into `tools`.
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Box<dyn LogTool>>) -> Self {
        let index = tools
            .iter()
            .enumerate()
            .map(|(i, tool)| (tool.name().to_string(), i))
            .collect();
        Self { tools, index }
    }

    /// Build with every tool from `dl-log-parser`.
    pub fn with_defaults() -> Self {
        Self::new(dl_log_parser::tools::all_tools())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&dyn LogTool> {
        self.index.get(name).map(|&i| self.tools[i].as_ref())
    }

    /// Registered tools, sorted by name.
    pub fn list(&self) -> Vec<ToolInfo> {
        let mut infos: Vec<_> = self
            .tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
                schema: t.parameters_schema(),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Run the named tool. An unknown name is a failure result, not an error.
    pub async fn dispatch(
        &self,
        name: &str,
        args: serde_json::Value,
        source: &dyn LogSource,
        config: &ViewerConfig,
    ) -> LogResult<ToolResult> {
        let Some(tool) = self.get(name) else {
            tracing::warn!(tool = name, "unknown tool requested");
            return Ok(ToolResult::failure(name, format!("unknown tool: {name}")));
        };
        tracing::debug!(tool = name, "dispatching tool");
        tool.execute(args, source, config).await
    }
}
