//! The template syntax shared by every renderer.
//!
//! Supported: `{{ variable }}`, `{# comment #}`, `{% include "name" %}` and
//! `{% load ... %}` (accepted and ignored). Any other block tag fails the
//! render instead of producing half a page.

use pylon_core::{
    application::ApplicationError,
    domain::{RenderContext, validate_template_name},
    error::{PylonError, PylonResult},
};

/// Includes nested deeper than this fail the render.
pub const MAX_INCLUDE_DEPTH: usize = 8;

/// Render `name`, fetching template sources through `load`.
pub(crate) fn render<L>(name: &str, context: &RenderContext, load: &L) -> PylonResult<String>
where
    L: Fn(&str) -> PylonResult<String>,
{
    render_nested(name, context, load, 0)
}

fn render_nested<L>(
    name: &str,
    context: &RenderContext,
    load: &L,
    depth: usize,
) -> PylonResult<String>
where
    L: Fn(&str) -> PylonResult<String>,
{
    validate_template_name(name)?;
    let source = strip_comments(&load(name)?);

    let mut out = String::with_capacity(source.len());
    let mut rest = source.as_str();

    while let Some(start) = rest.find("{%") {
        out.push_str(&context.render(&rest[..start]));

        let after = &rest[start + 2..];
        let end = after
            .find("%}")
            .ok_or_else(|| failed(name, "unclosed '{%' tag"))?;

        match parse_tag(after[..end].trim()).map_err(|reason| failed(name, reason))? {
            Tag::Load => {}
            Tag::Include(target) => {
                if depth + 1 > MAX_INCLUDE_DEPTH {
                    return Err(failed(
                        name,
                        format!("includes nested deeper than {MAX_INCLUDE_DEPTH}"),
                    ));
                }
                let included = render_nested(target, context, load, depth + 1)
                    .map_err(|e| failed(name, format!("include \"{target}\": {e}")))?;
                out.push_str(&included);
            }
            Tag::Unsupported(word) => {
                return Err(failed(name, format!("unsupported tag '{word}'")));
            }
        }

        rest = &after[end + 2..];
    }

    out.push_str(&context.render(rest));
    Ok(out)
}

#[derive(Debug, PartialEq, Eq)]
enum Tag<'a> {
    Include(&'a str),
    Load,
    Unsupported(&'a str),
}

fn parse_tag(body: &str) -> Result<Tag<'_>, String> {
    let (word, arg) = match body.split_once(char::is_whitespace) {
        Some((word, arg)) => (word, arg.trim()),
        None => (body, ""),
    };

    match word {
        "" => Err("empty tag".into()),
        "load" => Ok(Tag::Load),
        "include" => unquote(arg)
            .map(Tag::Include)
            .ok_or_else(|| format!("include expects a quoted template name, got '{arg}'")),
        other => Ok(Tag::Unsupported(other)),
    }
}

fn unquote(arg: &str) -> Option<&str> {
    let quote = arg.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    arg.strip_prefix(quote)?
        .strip_suffix(quote)
        .filter(|inner| !inner.is_empty())
}

/// Drop `{# ... #}` before tags are parsed, so commented-out tags are inert.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("{#") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("#}") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

fn failed(template: &str, reason: impl Into<String>) -> PylonError {
    ApplicationError::RenderingFailed {
        template: template.to_string(),
        reason: reason.into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn render_from(templates: &[(&str, &str)], name: &str) -> PylonResult<String> {
        let map: HashMap<String, String> = templates
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let load = |name: &str| -> PylonResult<String> {
            map.get(name).cloned().ok_or_else(|| {
                ApplicationError::TemplateNotFound {
                    name: name.to_string(),
                }
                .into()
            })
        };
        render(name, &RenderContext::empty(), &load)
    }

    #[test]
    fn includes_and_load_tags() {
        let out = render_from(
            &[
                ("home.html", "{% load static %}<nav>{% include \"nav.html\" %}</nav>"),
                ("nav.html", "<a href=\"/\">Home</a>"),
            ],
            "home.html",
        )
        .unwrap();
        assert_eq!(out, "<nav><a href=\"/\">Home</a></nav>");
    }

    #[test]
    fn variables_render_empty_without_context() {
        let out = render_from(&[("a.html", "<title>{{ title }}</title>")], "a.html").unwrap();
        assert_eq!(out, "<title></title>");
    }

    #[test]
    fn commented_tags_are_ignored() {
        let out = render_from(&[("a.html", "x{# {% url 'home' %} #}y")], "a.html").unwrap();
        assert_eq!(out, "xy");
    }

    #[test]
    fn unsupported_tag_fails() {
        let err = render_from(&[("a.html", "{% url 'home' %}")], "a.html").unwrap_err();
        assert!(err.to_string().contains("unsupported tag 'url'"));
    }

    #[test]
    fn unclosed_tag_fails() {
        assert!(render_from(&[("a.html", "{% include \"b.html\"")], "a.html").is_err());
    }

    #[test]
    fn recursive_include_hits_depth_limit() {
        let err = render_from(&[("loop.html", "{% include 'loop.html' %}")], "loop.html")
            .unwrap_err();
        assert!(err.to_string().contains("deeper than"));
    }

    #[test]
    fn missing_include_fails_outer_template() {
        let err = render_from(&[("a.html", "{% include 'gone.html' %}")], "a.html").unwrap_err();
        assert!(matches!(
            err,
            PylonError::Application(ApplicationError::RenderingFailed { ref template, .. })
                if template == "a.html"
        ));
    }

    #[test]
    fn missing_top_level_template_is_not_found() {
        let err = render_from(&[], "nope.html").unwrap_err();
        assert!(matches!(
            err,
            PylonError::Application(ApplicationError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn tag_parsing() {
        assert_eq!(parse_tag("include \"x.html\""), Ok(Tag::Include("x.html")));
        assert_eq!(parse_tag("load static i18n"), Ok(Tag::Load));
        assert_eq!(parse_tag("block content"), Ok(Tag::Unsupported("block")));
        assert!(parse_tag("include x.html").is_err());
        assert!(parse_tag("").is_err());
    }
}
