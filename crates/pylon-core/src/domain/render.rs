//! Render context and output-name overrides for the static export.

use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Variables available to a template.
///
/// The static export always renders with [`RenderContext::empty`]; variables
/// that are not present render as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    variables: HashMap<String, String>,
}

impl RenderContext {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Substitute `{{ name }}` placeholders and drop `{# ... #}` comments.
    ///
    /// A filter suffix (`{{ name|upper }}`) is ignored. An unterminated
    /// placeholder or comment is copied through verbatim.
    pub fn render(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];

            let (close, is_var) = if tail.starts_with("{{") {
                ("}}", true)
            } else if tail.starts_with("{#") {
                ("#}", false)
            } else {
                out.push('{');
                rest = &tail[1..];
                continue;
            };

            match tail[2..].find(close) {
                Some(end) => {
                    if is_var {
                        let expr = tail[2..2 + end].trim();
                        let name = expr.split('|').next().unwrap_or_default().trim();
                        out.push_str(self.get(name).unwrap_or_default());
                    }
                    rest = &tail[2 + end + 2..];
                }
                None => {
                    out.push_str(tail);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        out
    }
}

/// Template name → output file name overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputMapping(BTreeMap<String, String>);

impl OutputMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// The site's landing page is exported as `index.html`.
    pub fn standard() -> Self {
        Self::new().with("home.html", "index.html")
    }

    pub fn with(mut self, template: impl Into<String>, output: impl Into<String>) -> Self {
        self.0.insert(template.into(), output.into());
        self
    }

    /// Output name for `template`, defaulting to the template's own name.
    pub fn output_name<'a>(&'a self, template: &'a str) -> &'a str {
        self.0.get(template).map(String::as_str).unwrap_or(template)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// An output name must be a non-empty relative path that stays inside the
/// output directory.
pub fn validate_output_name(name: &str) -> Result<(), DomainError> {
    match relative_path_issue(name) {
        Some(reason) => Err(DomainError::InvalidOutputName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Template names follow the same rule, relative to the template root.
pub fn validate_template_name(name: &str) -> Result<(), DomainError> {
    match relative_path_issue(name) {
        Some(reason) => Err(DomainError::InvalidTemplateName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

fn relative_path_issue(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        return Some("name is empty");
    }
    let path = Path::new(name);
    if path.is_absolute() || name.starts_with('/') || name.starts_with('\\') {
        return Some("absolute paths are not allowed");
    }
    if path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Some("'..' and prefixes are not allowed");
    }
    None
}
