//! `pylon render-static`: export templates as HTML files.

use std::path::Path;

use pylon_adapters::{DirectoryRenderer, LocalFilesystem};
use pylon_core::application::{RenderReport, StaticRenderService};
use serde_json::json;
use tracing::{info, instrument};

use crate::{
    cli::{OutputFormat, RenderStaticArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Render the named templates, or the whole catalog when none are named.
///
/// A template that fails is reported and skipped; the command still
/// succeeds.
#[instrument(skip_all)]
pub fn execute(args: RenderStaticArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let templates = args.templates.unwrap_or(config.render.templates_dir);
    let output_dir = args.output.unwrap_or(config.render.output_dir);

    if !templates.is_dir() {
        return Err(CliError::TemplatesNotFound { path: templates });
    }

    let renderer = DirectoryRenderer::new(&templates).with_extensions(&config.render.extensions);
    let service = StaticRenderService::new(Box::new(renderer), Box::new(LocalFilesystem::new()));

    let report = if args.names.is_empty() {
        service.render_catalog(&config.render.overrides, &output_dir)?
    } else {
        service.render_all(&args.names, &config.render.overrides, &output_dir)?
    };

    info!(
        written = report.count(),
        failed = report.failures.len(),
        "Static render finished"
    );

    if output.format() == OutputFormat::Json {
        output.emit(&report_json(&report, &output_dir).to_string())?;
        return Ok(());
    }

    for path in &report.written {
        output.print(&format!("Wrote {}", path.display()))?;
    }
    for failure in &report.failures {
        output.error(&format!("{}: {}", failure.template, failure.reason))?;
    }

    let attempted = report.count() + report.failures.len();
    if report.is_complete() {
        output.success(&format!(
            "Rendered {} template(s) to {}",
            report.count(),
            output_dir.display()
        ))?;
    } else {
        output.warning(&format!(
            "Rendered {} of {} template(s) to {}",
            report.count(),
            attempted,
            output_dir.display()
        ))?;
    }

    Ok(())
}

fn report_json(report: &RenderReport, output_dir: &Path) -> serde_json::Value {
    json!({
        "output_dir": output_dir.display().to_string(),
        "written": report
            .written
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>(),
        "failures": report
            .failures
            .iter()
            .map(|f| json!({ "template": f.template, "reason": f.reason }))
            .collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pylon_core::application::RenderFailure;

    use super::*;

    #[test]
    fn json_report_lists_files_and_failures() {
        let report = RenderReport {
            written: vec![PathBuf::from("out/index.html")],
            failures: vec![RenderFailure {
                template: "broken.html".into(),
                reason: "unsupported tag 'url'".into(),
            }],
        };
        let value = report_json(&report, Path::new("out"));
        assert_eq!(value["written"][0], "out/index.html");
        assert_eq!(value["failures"][0]["template"], "broken.html");
        assert_eq!(value["output_dir"], "out");
    }
}
