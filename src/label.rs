//! Result label rendering
//!
//! Labels are produced from a feature's attribute set, either with a
//! `{key}` template or with an arbitrary closure.

use crate::geo::Properties;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Default label: address line, classification, then context on a second line
pub const DEFAULT_HTML_TEMPLATE: &str = concat!(
    r#"<span class="geocoder-address-item"> {label} </span>({type})<span></span>"#,
    "<br/>",
    r#"<span class="geocoder-address-detail">{context}</span>"#,
);

/// Renders a display label from a feature's attributes
#[derive(Clone)]
pub struct LabelRenderer(Arc<dyn Fn(&Properties) -> String + Send + Sync>);

impl LabelRenderer {
    /// Wrap a rendering function
    pub fn new<F>(render: F) -> Self
    where
        F: Fn(&Properties) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(render))
    }

    /// Render with a `{key}` template, HTML-escaping substituted values
    pub fn from_template(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |properties| template(&text, properties, true))
    }

    /// Render with [`DEFAULT_HTML_TEMPLATE`]
    pub fn default_html() -> Self {
        Self::from_template(DEFAULT_HTML_TEMPLATE)
    }

    pub fn render(&self, properties: &Properties) -> String {
        (self.0)(properties)
    }
}

impl fmt::Debug for LabelRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LabelRenderer")
    }
}

/// Substitute `{key}` placeholders with values from `data`
///
/// Keys are word characters, optionally padded with spaces (`{ key }`).
/// Missing keys, nulls, arrays and objects render as the empty string.
/// Anything that is not a well-formed placeholder is copied verbatim.
pub fn template(text: &str, data: &Properties, html_escape: bool) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match placeholder_key(after) {
            Some((key, consumed)) => {
                let value = scalar_to_string(data.get(key));
                if html_escape {
                    push_escaped(&mut output, &value);
                } else {
                    output.push_str(&value);
                }
                rest = &after[consumed..];
            }
            None => {
                output.push('{');
                rest = after;
            }
        }
    }
    output.push_str(rest);
    output
}

/// Parse `  key  }` at the start of `s`, returning the key and bytes consumed
fn placeholder_key(s: &str) -> Option<(&str, usize)> {
    let close = s.find('}')?;
    let inner = s[..close].trim_matches(' ');
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    if inner.is_empty() || !inner.chars().all(is_word) {
        return None;
    }
    Some((inner, close + 1))
}

fn scalar_to_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn push_escaped(output: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            '`' => output.push_str("&#x60;"),
            _ => output.push(c),
        }
    }
}
