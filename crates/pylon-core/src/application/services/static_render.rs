//! Static Render Service - exports templates as static files.
//!
//! Each template is rendered with an empty context and written under the
//! output directory. A failing template is logged and skipped; only failing
//! to create the output directory aborts the run.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::{
    application::ports::{Filesystem, TemplateRenderer},
    domain::{OutputMapping, RenderContext, validate_output_name},
    error::PylonResult,
};

/// A template that could not be exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFailure {
    pub template: String,
    pub reason: String,
}

/// Outcome of one export run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Files written, in template-name order.
    pub written: Vec<PathBuf>,
    pub failures: Vec<RenderFailure>,
}

impl RenderReport {
    /// Number of files written.
    pub fn count(&self) -> usize {
        self.written.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct StaticRenderService {
    pub(super) renderer: Box<dyn TemplateRenderer>,
    pub(super) filesystem: Box<dyn Filesystem>,
}

impl StaticRenderService {
    pub fn new(renderer: Box<dyn TemplateRenderer>, filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            renderer,
            filesystem,
        }
    }

    /// Render `template_names` into `output_dir`.
    ///
    /// Names are deduplicated and processed in sorted order. Output file
    /// names come from `overrides`, defaulting to the template name.
    ///
    /// # Errors
    ///
    /// Only when `output_dir` cannot be created. Per-template failures are
    /// collected in [`RenderReport::failures`].
    #[instrument(skip_all, fields(output_dir = %output_dir.display()))]
    pub fn render_all<S: AsRef<str>>(
        &self,
        template_names: &[S],
        overrides: &OutputMapping,
        output_dir: &Path,
    ) -> PylonResult<RenderReport> {
        let mut names: Vec<&str> = template_names.iter().map(AsRef::as_ref).collect();
        names.sort_unstable();
        names.dedup();

        self.filesystem.create_dir_all(output_dir)?;

        let context = RenderContext::empty();
        let mut report = RenderReport::default();

        for name in names {
            match self.render_one(name, overrides, output_dir, &context) {
                Ok(path) => {
                    info!(template = name, path = %path.display(), "Wrote static page");
                    report.written.push(path);
                }
                Err(e) => {
                    warn!(template = name, error = %e, "Skipping template");
                    report.failures.push(RenderFailure {
                        template: name.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            written = report.count(),
            failed = report.failures.len(),
            "Static render finished"
        );
        Ok(report)
    }

    /// Render every template the renderer knows about.
    pub fn render_catalog(
        &self,
        overrides: &OutputMapping,
        output_dir: &Path,
    ) -> PylonResult<RenderReport> {
        let names = self.renderer.templates()?;
        self.render_all(&names, overrides, output_dir)
    }

    fn render_one(
        &self,
        name: &str,
        overrides: &OutputMapping,
        output_dir: &Path,
        context: &RenderContext,
    ) -> PylonResult<PathBuf> {
        let output_name = overrides.output_name(name);
        validate_output_name(output_name)?;

        let rendered = self.renderer.render(name, context)?;

        let path = output_dir.join(output_name);
        if let Some(parent) = path.parent().filter(|p| *p != output_dir) {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(&path, &rendered)?;
        Ok(path)
    }
}
