//! Gateway configuration.
//!
//! Everything the gateway needs is passed in through [`GatewayConfig`] when it
//! is constructed; nothing is read from process-global state afterwards. The
//! CLI fills this from its layered config; embedders build it directly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{ProcessModel, ResponseShape};

/// Which configuration set the application initializes from.
///
/// Fixed before the application is built and handed to the factory as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Settings selector, e.g. `site.settings`.
    pub module: String,
    /// Free-form values for the factory.
    pub values: BTreeMap<String, String>,
}

impl Settings {
    pub const DEFAULT_MODULE: &'static str = "site.settings";

    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MODULE)
    }
}

/// Fallbacks used when a request does not say otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// `SERVER_NAME` without a `host` header.
    pub default_name: String,
    /// `SERVER_PORT` without a port in `host` or `x-forwarded-port`.
    pub default_port: String,
    /// URL scheme without `x-forwarded-proto`.
    pub default_scheme: String,
    pub protocol: String,
    pub script_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            default_name: "localhost".into(),
            default_port: "80".into(),
            default_scheme: "https".into(),
            protocol: "HTTP/1.1".into(),
            script_name: String::new(),
        }
    }
}

/// Complete gateway configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub settings: Settings,
    pub server: ServerConfig,
    pub process: ProcessModel,
    pub response_shape: ResponseShape,
}
