//! Source link rewriting for displayed messages.

use regex::Regex;
use std::collections::HashMap;

use crate::config::ViewerConfig;

/// Turns installation-root paths inside a message into source links.
///
/// A match is the root followed by a run of `[A-Za-z0-9._/-]`. Each distinct
/// path gets one replacement, reused for every occurrence in the message.
/// The output is HTML: text between links is escaped, so markup carried in
/// a logged message stays inert. Rewriting already-rewritten text would
/// escape and wrap it again, so apply it once per retrieval on a copy of
/// the stored message.
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    root: String,
    viewer_url: String,
    pattern: Option<Regex>,
}

impl LinkRewriter {
    pub fn new(root: impl Into<String>, viewer_url: impl Into<String>) -> Self {
        let root = root.into();
        let pattern = if root.is_empty() {
            None
        } else {
            Regex::new(&format!(r"{}[A-Za-z0-9._/\-]+", regex::escape(&root))).ok()
        };
        Self {
            root,
            viewer_url: viewer_url.into(),
            pattern,
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(config.root_path.clone(), config.viewer_url.clone())
    }

    /// Render `message` as HTML with every root path turned into a link.
    ///
    /// Without a root the message is returned as stored.
    pub fn rewrite(&self, message: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return message.to_string();
        };

        let mut out = String::with_capacity(message.len());
        let mut replacements: HashMap<&str, String> = HashMap::new();
        let mut last = 0;
        for m in pattern.find_iter(message) {
            escape_html_into(&message[last..m.start()], &mut out);
            let link = replacements
                .entry(m.as_str())
                .or_insert_with(|| self.link(m.as_str()));
            out.push_str(link);
            last = m.end();
        }
        escape_html_into(&message[last..], &mut out);
        out
    }

    fn link(&self, path: &str) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let relative = relative.trim_start_matches('/');
        format!(
            r#"<a href="{}?file={}" class="dl-source-link">{}</a>"#,
            escape_html(&self.viewer_url),
            escape_html(relative),
            escape_html(path)
        )
    }
}

/// Escape `&`, `<`, `>` and `"` for HTML text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_html_into(text, &mut out);
    out
}

fn escape_html_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
