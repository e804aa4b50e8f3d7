//! `pylon handle`: run one host event through the gateway.
//!
//! The event is the JSON a serverless host would deliver. The application is
//! the template site over the configured template directory.

use std::io::Read as _;
use std::path::Path;

use http::StatusCode;
use pylon_adapters::TemplateSiteFactory;
use pylon_core::{
    application::{Gateway, GatewayConfig},
    domain::{HostRequest, HostResponse, OutboundResponse},
};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    cli::{HandleArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(args: HandleArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let event = read_event(args.event.as_deref())?;
    let gateway_config = gateway_config(&args, &config)?;
    let protocol = gateway_config.server.protocol.clone();

    let factory = TemplateSiteFactory::new().with_extensions(config.render.extensions.clone());
    let gateway = Gateway::new(gateway_config, Box::new(factory));

    let response = gateway.handle(HostRequest::from_json(event));
    debug!(status = ?response.status(), "Event handled");

    match response {
        HostResponse::Mapping(value) => output.emit(&pretty(&value)?)?,
        HostResponse::Structured(response) if output.format() == OutputFormat::Json => {
            output.emit(&pretty(&response.to_mapping())?)?
        }
        HostResponse::Structured(response) => output.emit(&http_message(&protocol, &response))?,
    }

    Ok(())
}

/// Read and parse the event; `None` or `-` means stdin.
fn read_event(path: Option<&Path>) -> CliResult<Value> {
    let (origin, text) = match path {
        Some(path) if path != Path::new("-") => {
            let text = std::fs::read_to_string(path)
                .with_cli_context(|| format!("Failed to read event file {}", path.display()))?;
            (path.display().to_string(), text)
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .with_cli_context(|| "Failed to read event from stdin")?;
            ("stdin".to_string(), text)
        }
    };

    serde_json::from_str(&text).map_err(|source| CliError::InvalidEvent { origin, source })
}

/// The configured gateway with command-line overrides applied.
///
/// `template_dir` comes from `--templates`, else the configured settings
/// value, else `render.templates_dir`.
fn gateway_config(args: &HandleArgs, config: &AppConfig) -> CliResult<GatewayConfig> {
    let mut gateway = config.gateway.clone();

    if let Some(module) = &args.settings {
        if module.trim().is_empty() {
            return Err(CliError::InvalidInput {
                message: "--settings must not be empty".into(),
                source: None,
            });
        }
        gateway.settings.module = module.clone();
    }

    let key = TemplateSiteFactory::TEMPLATE_DIR.to_string();
    match &args.templates {
        Some(dir) => {
            gateway
                .settings
                .values
                .insert(key, dir.display().to_string());
        }
        None => {
            gateway
                .settings
                .values
                .entry(key)
                .or_insert_with(|| config.render.templates_dir.display().to_string());
        }
    }

    if let Some(shape) = args.shape {
        gateway.response_shape = shape.into();
    }

    Ok(gateway)
}

/// Status line, headers, blank line, body.
fn http_message(protocol: &str, response: &OutboundResponse) -> String {
    let reason = StatusCode::from_u16(response.status())
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("");

    let mut message = format!("{protocol} {} {reason}", response.status())
        .trim_end()
        .to_string();
    message.push('\n');
    for (name, value) in response.headers().iter() {
        message.push_str(&format!("{name}: {value}\n"));
    }
    message.push('\n');
    message.push_str(&String::from_utf8_lossy(response.body()));
    message
}

fn pretty(value: &Value) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::InvalidInput {
        message: format!("Response is not serialisable: {e}"),
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pylon_core::domain::{HeaderMap, ResponseShape};

    use super::*;
    use crate::cli::ShapeArg;

    fn args() -> HandleArgs {
        HandleArgs {
            event: None,
            templates: None,
            settings: None,
            shape: None,
        }
    }

    #[test]
    fn template_dir_defaults_to_render_config() {
        let config = AppConfig::default();
        let gateway = gateway_config(&args(), &config).unwrap();
        assert_eq!(gateway.settings.value("template_dir"), Some("templates"));
        assert_eq!(gateway.response_shape, ResponseShape::Structured);
    }

    #[test]
    fn configured_template_dir_is_kept() {
        let mut config = AppConfig::default();
        config
            .gateway
            .settings
            .values
            .insert("template_dir".into(), "site/templates".into());
        let gateway = gateway_config(&args(), &config).unwrap();
        assert_eq!(gateway.settings.value("template_dir"), Some("site/templates"));
    }

    #[test]
    fn flags_override_config() {
        let args = HandleArgs {
            templates: Some(PathBuf::from("other")),
            settings: Some("school.settings".into()),
            shape: Some(ShapeArg::Mapping),
            ..args()
        };
        let gateway = gateway_config(&args, &AppConfig::default()).unwrap();
        assert_eq!(gateway.settings.value("template_dir"), Some("other"));
        assert_eq!(gateway.settings.module, "school.settings");
        assert_eq!(gateway.response_shape, ResponseShape::Mapping);
    }

    #[test]
    fn empty_settings_is_rejected() {
        let args = HandleArgs {
            settings: Some("  ".into()),
            ..args()
        };
        let err = gateway_config(&args, &AppConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn http_message_layout() {
        let headers = HeaderMap::from_pairs([("Content-Type", "text/html")]);
        let response = OutboundResponse::new(200, headers, b"<h1>Hi</h1>".to_vec());
        assert_eq!(
            http_message("HTTP/1.1", &response),
            "HTTP/1.1 200 OK\nContent-Type: text/html\n\n<h1>Hi</h1>"
        );
    }

    #[test]
    fn unknown_status_has_no_reason() {
        let response = OutboundResponse::new(599, HeaderMap::new(), Vec::new());
        assert!(http_message("HTTP/1.1", &response).starts_with("HTTP/1.1 599\n"));
    }

    #[test]
    fn event_file_must_be_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, "not json").unwrap();
        let err = read_event(Some(&path)).unwrap_err();
        assert!(matches!(err, CliError::InvalidEvent { .. }));

        std::fs::write(&path, r#"{"path": "/"}"#).unwrap();
        assert_eq!(read_event(Some(&path)).unwrap()["path"], "/");
    }
}
