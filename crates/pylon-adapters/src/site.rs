//! A small application that serves templates as pages.
//!
//! `/` is `home.html`, `/<name>` and `/<name>/` are `<name>.html`. It is the
//! application the CLI drives through the gateway.

use std::path::PathBuf;
use std::sync::Arc;

use http::StatusCode;
use pylon_core::{
    application::{
        ApplicationError, Settings,
        ports::{
            AppResult, Application, ApplicationFactory, BoxError, ChunkBody, ResponseBody,
            StartResponse, TemplateRenderer,
        },
    },
    domain::{Environ, RenderContext},
    error::PylonError,
};
use tracing::{debug, info};

use crate::renderer::DirectoryRenderer;

const HTML: &str = "text/html; charset=utf-8";
const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

/// Serves `GET` and `HEAD` from a template renderer.
#[derive(Clone)]
pub struct TemplateSite {
    renderer: Arc<dyn TemplateRenderer>,
}

impl TemplateSite {
    pub const HOME: &'static str = "home.html";

    pub fn new(renderer: impl TemplateRenderer + 'static) -> Self {
        Self {
            renderer: Arc::new(renderer),
        }
    }

    /// Template for a request path, or `None` when no page can match.
    pub fn page_for(path: &str) -> Option<String> {
        let name = path.trim_matches('/');
        if name.is_empty() {
            return Some(Self::HOME.to_string());
        }
        let valid = name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| format!("{name}.html"))
    }
}

impl Application for TemplateSite {
    fn call(&self, environ: &mut Environ, start_response: &mut dyn StartResponse) -> AppResult {
        let head = match environ.method() {
            "GET" => false,
            "HEAD" => true,
            other => {
                debug!(method = other, "Method not allowed");
                start_response.start_response(
                    &status_line(StatusCode::METHOD_NOT_ALLOWED),
                    vec![
                        ("Content-Type".into(), PLAIN_TEXT.into()),
                        ("Allow".into(), "GET, HEAD".into()),
                    ],
                );
                return Ok(ChunkBody::new(["Method Not Allowed"]).boxed());
            }
        };

        let Some(page) = Self::page_for(environ.path_info()) else {
            return Ok(not_found(start_response));
        };

        match self.renderer.render(&page, &RenderContext::empty()) {
            Ok(html) => {
                debug!(page, bytes = html.len(), "Page rendered");
                start_response.start_response(
                    &status_line(StatusCode::OK),
                    vec![
                        ("Content-Type".into(), HTML.into()),
                        ("Content-Length".into(), html.len().to_string()),
                    ],
                );
                let body = if head { ChunkBody::empty() } else { ChunkBody::new([html]) };
                Ok(body.boxed())
            }
            Err(PylonError::Application(ApplicationError::TemplateNotFound { .. })) => {
                debug!(page, "No such page");
                Ok(not_found(start_response))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn not_found(start_response: &mut dyn StartResponse) -> Box<dyn ResponseBody> {
    start_response.start_response(
        &status_line(StatusCode::NOT_FOUND),
        vec![("Content-Type".into(), PLAIN_TEXT.into())],
    );
    ChunkBody::new(["Not Found"]).boxed()
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

/// Builds a [`TemplateSite`] over the directory named by the `template_dir`
/// setting.
#[derive(Debug, Clone, Default)]
pub struct TemplateSiteFactory {
    extensions: Option<Vec<String>>,
}

impl TemplateSiteFactory {
    /// Settings key naming the template directory.
    pub const TEMPLATE_DIR: &'static str = "template_dir";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = Some(extensions);
        self
    }
}

impl ApplicationFactory for TemplateSiteFactory {
    fn build(&self, settings: &Settings) -> Result<Arc<dyn Application>, BoxError> {
        let dir = settings.value(Self::TEMPLATE_DIR).ok_or_else(|| {
            format!(
                "settings '{}' have no '{}' value",
                settings.module,
                Self::TEMPLATE_DIR
            )
        })?;

        let root = PathBuf::from(dir);
        if !root.is_dir() {
            return Err(format!("template directory '{}' does not exist", root.display()).into());
        }

        let mut renderer = DirectoryRenderer::new(&root);
        if let Some(extensions) = &self.extensions {
            renderer = renderer.with_extensions(extensions);
        }

        info!(settings = %settings.module, root = %root.display(), "Template site ready");
        Ok(Arc::new(TemplateSite::new(renderer)))
    }
}
