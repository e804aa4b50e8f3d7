//! End-to-end tests for the `pylon` binary.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

fn templates() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "home.html", "{% load static %}<h1>Home</h1>{% include 'partials/nav.html' %}");
    write(dir.path(), "about.html", "<h1>About</h1>");
    write(dir.path(), "partials/nav.html", "<nav/>");
    dir
}

/// A `pylon` command that ignores the user's environment.
fn pylon() -> Command {
    let mut cmd = Command::cargo_bin("pylon").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    pylon()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("render-static"))
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("handle"));
}

#[test]
fn test_version() {
    pylon()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_render_static_writes_files() {
    let templates = templates();
    let out = tempfile::tempdir().unwrap();

    pylon()
        .args(["render-static", "-t"])
        .arg(templates.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    assert_eq!(
        std::fs::read_to_string(out.path().join("index.html")).unwrap(),
        "<h1>Home</h1><nav/>"
    );
    assert_eq!(
        std::fs::read_to_string(out.path().join("about.html")).unwrap(),
        "<h1>About</h1>"
    );
}

#[test]
fn test_render_static_named_templates_only() {
    let templates = templates();
    let out = tempfile::tempdir().unwrap();

    pylon()
        .args(["render-static", "about.html", "-t"])
        .arg(templates.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success();

    assert!(out.path().join("about.html").exists());
    assert!(!out.path().join("index.html").exists());
}

#[test]
fn test_render_static_skips_broken_template() {
    let templates = templates();
    write(templates.path(), "broken.html", "{% url 'home' %}");
    let out = tempfile::tempdir().unwrap();

    pylon()
        .args(["render-static", "-t"])
        .arg(templates.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("broken.html"));

    assert!(out.path().join("index.html").exists());
    assert!(!out.path().join("broken.html").exists());
}

#[test]
fn test_render_static_missing_templates_dir() {
    let dir = tempfile::tempdir().unwrap();

    pylon()
        .args(["render-static", "-t"])
        .arg(dir.path().join("absent"))
        .arg("-o")
        .arg(dir.path().join("out"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Template directory not found"));
}

#[test]
fn test_render_static_output_dir_from_env() {
    let templates = templates();
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("site");

    pylon()
        .env("PYLON_RENDER__OUTPUT_DIR", &target)
        .args(["render-static", "-t"])
        .arg(templates.path())
        .assert()
        .success();

    assert!(target.join("index.html").exists());
}

#[test]
fn test_build_copies_assets_and_renders() {
    let project = tempfile::tempdir().unwrap();
    write(project.path(), "templates/home.html", "<h1>Home</h1>");
    write(project.path(), "static/css/style.css", "body { margin: 0 }");
    write(project.path(), "static/js/vendor/app.js", "init();");
    write(project.path(), "staticfiles/admin/base.css", "/* admin */");
    write(project.path(), "dist/public/stale.html", "old");

    pylon()
        .current_dir(project.path())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied 3 asset file(s)"))
        .stdout(predicate::str::contains("Built site in dist/public"));

    let public = project.path().join("dist/public");
    assert_eq!(
        std::fs::read_to_string(public.join("static/css/style.css")).unwrap(),
        "body { margin: 0 }"
    );
    assert!(public.join("static/js/vendor/app.js").exists());
    assert!(public.join("staticfiles/admin/base.css").exists());
    assert_eq!(
        std::fs::read_to_string(public.join("index.html")).unwrap(),
        "<h1>Home</h1>"
    );
    assert!(!public.join("stale.html").exists());
}

#[test]
fn test_build_writes_fallback_index() {
    let project = tempfile::tempdir().unwrap();

    pylon()
        .current_dir(project.path())
        .env("PYLON_BUILD__SITE_TITLE", "Akonsec School")
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created fallback"))
        .stderr(predicate::str::contains("No static directory found"))
        .stderr(predicate::str::contains("Could not render templates"));

    let index = std::fs::read_to_string(project.path().join("dist/public/index.html")).unwrap();
    assert!(index.starts_with("<!DOCTYPE html>"));
    assert!(index.contains("<title>Akonsec School</title>"));
}

#[test]
fn test_build_no_clean_keeps_output() {
    let project = tempfile::tempdir().unwrap();
    write(project.path(), "templates/about.html", "<h1>About</h1>");
    write(project.path(), "site/keep.txt", "kept");

    pylon()
        .current_dir(project.path())
        .args(["build", "--no-clean", "-o", "site"])
        .assert()
        .success()
        .stderr(predicate::str::contains("with warnings"));

    let site = project.path().join("site");
    assert!(site.join("keep.txt").exists());
    assert!(site.join("about.html").exists());
    assert!(site.join("index.html").exists());
}

#[test]
fn test_build_json_report() {
    let project = tempfile::tempdir().unwrap();
    write(project.path(), "templates/home.html", "<h1>Home</h1>");

    let out = pylon()
        .current_dir(project.path())
        .args(["--output-format", "json", "build"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["written"][0], "dist/public/index.html");
    assert_eq!(report["fallback_written"], false);
    assert_eq!(report["missing_assets"].as_array().unwrap().len(), 2);
}

#[test]
fn test_handle_event_file() {
    let templates = templates();
    let event = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(event.path(), r#"{"method": "GET", "url": "https://example.com/about/"}"#)
        .unwrap();

    pylon()
        .args(["handle", "--event"])
        .arg(event.path())
        .arg("--templates")
        .arg(templates.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("HTTP/1.1 200 OK"))
        .stdout(predicate::str::contains("<h1>About</h1>"));
}

#[test]
fn test_handle_event_from_stdin() {
    let templates = templates();

    pylon()
        .args(["handle", "--templates"])
        .arg(templates.path())
        .write_stdin(r#"{"path": "/"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("HTTP/1.1 200 OK"))
        .stdout(predicate::str::contains("<h1>Home</h1><nav/>"));
}

#[test]
fn test_handle_mapping_shape() {
    let templates = templates();

    let assert = pylon()
        .args(["handle", "--shape", "mapping", "--templates"])
        .arg(templates.path())
        .write_stdin(r#"{"rawPath": "/missing/"}"#)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let response: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(response["statusCode"], 404);
}

#[test]
fn test_handle_missing_templates_is_500() {
    let dir = tempfile::tempdir().unwrap();

    pylon()
        .args(["handle", "--templates"])
        .arg(dir.path().join("absent"))
        .write_stdin("{}")
        .assert()
        .success()
        .stdout(predicate::str::contains("500"))
        .stdout(predicate::str::contains("A server error occurred"));
}

#[test]
fn test_handle_invalid_json() {
    pylon()
        .arg("handle")
        .write_stdin("not json")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid event from stdin"));
}

#[test]
fn test_config_show() {
    pylon()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("templates_dir"))
        .stdout(predicate::str::contains("index.html"));
}

#[test]
fn test_config_file_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pylon.toml");
    std::fs::write(&path, "[render]\noutput_dir = \"public-site\"\n").unwrap();

    pylon()
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("public-site"));
}

#[test]
fn test_missing_config_file_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();

    pylon()
        .args(["config", "show", "--config"])
        .arg(dir.path().join("absent.toml"))
        .assert()
        .code(4);
}

#[test]
fn test_config_path() {
    pylon()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("toml"));
}

#[test]
fn test_quiet_conflicts_with_verbose() {
    pylon()
        .args(["-q", "-v", "config", "path"])
        .assert()
        .code(2);
}
