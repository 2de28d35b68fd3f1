//! Command-line invocation: `dl-viewer [CONFIG] [TOOL|--list] [JSON_ARGS]`.

use anyhow::Context;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/dl-viewer/viewer.toml";
pub const DEFAULT_TOOL: &str = "view_log";

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Print the registered tools and their schemas.
    List,
    /// Run one tool with JSON arguments.
    Run {
        tool: String,
        args: serde_json::Value,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub config_path: String,
    pub action: Action,
}

impl Invocation {
    /// Parse positional arguments (program name already skipped).
    pub fn from_args<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let config_path = args
            .next()
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        let tool = args.next().unwrap_or_else(|| DEFAULT_TOOL.to_string());

        if tool == "--list" {
            return Ok(Self {
                config_path,
                action: Action::List,
            });
        }

        let args = match args.next() {
            None => serde_json::json!({}),
            Some(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("tool arguments are not valid JSON: {raw}"))?,
        };
        if !args.is_object() {
            anyhow::bail!("tool arguments must be a JSON object");
        }

        Ok(Self {
            config_path,
            action: Action::Run { tool, args },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(args: &[&str]) -> anyhow::Result<Invocation> {
        Invocation::from_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults() {
        let inv = parse(&[]).unwrap();
        assert_eq!(inv.config_path, DEFAULT_CONFIG_PATH);
        assert_eq!(
            inv.action,
            Action::Run {
                tool: "view_log".into(),
                args: json!({})
            }
        );
    }

    #[test]
    fn tool_with_arguments() {
        let inv = parse(&["viewer.toml", "view_log", r#"{"page": 2, "order": "asc"}"#]).unwrap();
        assert_eq!(inv.config_path, "viewer.toml");
        let Action::Run { tool, args } = inv.action else {
            panic!("expected run");
        };
        assert_eq!(tool, "view_log");
        assert_eq!(args["page"], 2);
    }

    #[test]
    fn list_action() {
        assert_eq!(parse(&["viewer.toml", "--list"]).unwrap().action, Action::List);
    }

    #[test]
    fn rejects_bad_json() {
        assert!(parse(&["viewer.toml", "view_log", "{page"]).is_err());
        assert!(parse(&["viewer.toml", "view_log", "[1, 2]"]).is_err());
    }
}
