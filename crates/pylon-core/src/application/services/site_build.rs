//! Site build - assemble a deployable static directory.
//!
//! A build cleans the output directory, copies asset trees into it, renders
//! the template catalog, writes a fallback `index.html` when no home page was
//! produced and reports expected pages that are still missing.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::static_render::{RenderReport, StaticRenderService};
use crate::{
    domain::OutputMapping,
    error::{PylonError, PylonResult},
};

const INDEX_PAGE: &str = "index.html";

/// An asset tree copied verbatim into the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDir {
    pub source: PathBuf,
    /// Destination relative to the output directory.
    pub target: PathBuf,
}

impl AssetDir {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// What a build produces and where.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub output_dir: PathBuf,
    /// Remove the output directory before building.
    pub clean: bool,
    pub assets: Vec<AssetDir>,
    pub overrides: OutputMapping,
    /// Output file names that should exist once the build is done.
    pub expected_pages: Vec<String>,
    /// Title of the fallback home page.
    pub site_title: String,
}

impl BuildPlan {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            clean: true,
            assets: vec![
                AssetDir::new("static", "static"),
                AssetDir::new("staticfiles", "staticfiles"),
            ],
            overrides: OutputMapping::standard(),
            expected_pages: vec![INDEX_PAGE.to_string()],
            site_title: "Pylon site".to_string(),
        }
    }
}

/// Outcome of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub render: RenderReport,
    /// Asset files copied, as destination paths.
    pub copied: Vec<PathBuf>,
    /// Asset source directories that did not exist.
    pub missing_assets: Vec<PathBuf>,
    /// Set when the template catalog could not be rendered at all.
    pub render_error: Option<String>,
    pub fallback_written: bool,
    /// Expected pages absent from the output after the build.
    pub missing_pages: Vec<String>,
}

impl BuildReport {
    pub fn is_complete(&self) -> bool {
        self.render.is_complete()
            && self.render_error.is_none()
            && self.missing_assets.is_empty()
            && self.missing_pages.is_empty()
    }
}

impl StaticRenderService {
    /// Run a full site build.
    ///
    /// # Errors
    ///
    /// When cleaning, creating directories or copying assets fails, or when
    /// `clean` is requested for an output directory without a named
    /// component (such as `/` or `.`). Template problems never fail the
    /// build; they are recorded in the report.
    #[instrument(skip_all, fields(output_dir = %plan.output_dir.display()))]
    pub fn build(&self, plan: &BuildPlan) -> PylonResult<BuildReport> {
        let output_dir = plan.output_dir.as_path();
        let mut report = BuildReport::default();

        if plan.clean {
            if !has_named_component(output_dir) {
                return Err(PylonError::Configuration {
                    message: format!("refusing to clean '{}'", output_dir.display()),
                });
            }
            if self.filesystem.exists(output_dir) {
                self.filesystem.remove_dir_all(output_dir)?;
                info!("Cleaned output directory");
            }
        }
        self.filesystem.create_dir_all(output_dir)?;

        for asset in &plan.assets {
            if !self.filesystem.exists(&asset.source) {
                warn!(source = %asset.source.display(), "Asset directory not found");
                report.missing_assets.push(asset.source.clone());
                continue;
            }
            let copied = self.copy_tree(&asset.source, &output_dir.join(&asset.target))?;
            info!(source = %asset.source.display(), files = copied.len(), "Copied assets");
            report.copied.extend(copied);
        }

        match self.render_catalog(&plan.overrides, output_dir) {
            Ok(render) => report.render = render,
            Err(e) => {
                warn!(error = %e, "Could not render templates");
                report.render_error = Some(e.to_string());
            }
        }

        let index = output_dir.join(INDEX_PAGE);
        if !self.filesystem.exists(&index) {
            self.filesystem
                .write_file(&index, &fallback_page(&plan.site_title))?;
            info!(path = %index.display(), "Wrote fallback home page");
            report.fallback_written = true;
        }

        for page in &plan.expected_pages {
            if !self.filesystem.exists(&output_dir.join(page)) {
                warn!(page = %page, "Expected page is missing");
                report.missing_pages.push(page.clone());
            }
        }

        info!(
            pages = report.render.count(),
            assets = report.copied.len(),
            fallback = report.fallback_written,
            "Site build finished"
        );
        Ok(report)
    }

    fn copy_tree(&self, source: &Path, target: &Path) -> PylonResult<Vec<PathBuf>> {
        self.filesystem.create_dir_all(target)?;

        let mut copied = Vec::new();
        for relative in self.filesystem.files_under(source)? {
            let to = target.join(&relative);
            if let Some(parent) = to.parent().filter(|p| *p != target) {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.copy_file(&source.join(&relative), &to)?;
            copied.push(to);
        }
        Ok(copied)
    }
}

fn has_named_component(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::Normal(_)))
}

/// Minimal home page used when the catalog produced no `index.html`.
pub fn fallback_page(title: &str) -> String {
    let title = escape_html(title);
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         \x20   <meta charset=\"UTF-8\">\n\
         \x20   <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         \x20   <title>{title}</title>\n\
         \x20   <link rel=\"stylesheet\" href=\"/static/css/style.css\">\n\
         </head>\n\
         <body>\n\
         \x20   <h1>{title}</h1>\n\
         </body>\n\
         </html>\n"
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
