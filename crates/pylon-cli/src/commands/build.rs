//! `pylon build`: assemble a deployable static site.

use std::path::{Path, PathBuf};

use pylon_adapters::{DirectoryRenderer, LocalFilesystem};
use pylon_core::application::{BuildPlan, BuildReport, StaticRenderService};
use serde_json::json;
use tracing::instrument;

use crate::{
    cli::{BuildArgs, OutputFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Clean the output directory, copy asset trees, render the catalog and
/// make sure a home page exists.
///
/// Missing asset directories, template failures and missing pages are
/// warnings; the command still succeeds.
#[instrument(skip_all)]
pub fn execute(args: BuildArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let templates = args.templates.unwrap_or(config.render.templates_dir);
    let plan = BuildPlan {
        output_dir: args.output.unwrap_or(config.render.output_dir),
        clean: config.build.clean && !args.no_clean,
        assets: config.build.assets,
        overrides: config.render.overrides,
        expected_pages: config.build.expected_pages,
        site_title: config.build.site_title,
    };

    let renderer = DirectoryRenderer::new(&templates).with_extensions(&config.render.extensions);
    let service = StaticRenderService::new(Box::new(renderer), Box::new(LocalFilesystem::new()));
    let report = service.build(&plan)?;

    if output.format() == OutputFormat::Json {
        output.emit(&report_json(&report, &plan.output_dir).to_string())?;
        return Ok(());
    }

    for missing in &report.missing_assets {
        output.warning(&format!("No {} directory found", missing.display()))?;
    }
    if !report.copied.is_empty() {
        output.print(&format!("Copied {} asset file(s)", report.copied.len()))?;
    }
    for path in &report.render.written {
        output.print(&format!("Wrote {}", path.display()))?;
    }
    for failure in &report.render.failures {
        output.error(&format!("{}: {}", failure.template, failure.reason))?;
    }
    if let Some(reason) = &report.render_error {
        output.warning(&format!("Could not render templates: {reason}"))?;
    }
    if report.fallback_written {
        output.print(&format!(
            "Created fallback {}",
            plan.output_dir.join("index.html").display()
        ))?;
    }
    for page in &report.missing_pages {
        output.warning(&format!("Missing {page}"))?;
    }

    if report.is_complete() {
        output.success(&format!("Built site in {}", plan.output_dir.display()))?;
    } else {
        output.warning(&format!(
            "Built site in {} with warnings",
            plan.output_dir.display()
        ))?;
    }
    Ok(())
}

fn report_json(report: &BuildReport, output_dir: &Path) -> serde_json::Value {
    json!({
        "output_dir": output_dir.display().to_string(),
        "copied": display_all(&report.copied),
        "missing_assets": display_all(&report.missing_assets),
        "written": display_all(&report.render.written),
        "failures": report
            .render
            .failures
            .iter()
            .map(|f| json!({ "template": f.template, "reason": f.reason }))
            .collect::<Vec<_>>(),
        "render_error": report.render_error,
        "fallback_written": report.fallback_written,
        "missing_pages": report.missing_pages,
    })
}

fn display_all(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_report_includes_build_fields() {
        let report = BuildReport {
            copied: vec![PathBuf::from("out/static/app.js")],
            missing_assets: vec![PathBuf::from("staticfiles")],
            fallback_written: true,
            missing_pages: vec!["about.html".into()],
            ..BuildReport::default()
        };
        let value = report_json(&report, Path::new("out"));
        assert_eq!(value["copied"][0], "out/static/app.js");
        assert_eq!(value["missing_assets"][0], "staticfiles");
        assert_eq!(value["fallback_written"], true);
        assert_eq!(value["missing_pages"][0], "about.html");
        assert!(value["render_error"].is_null());
    }
}
