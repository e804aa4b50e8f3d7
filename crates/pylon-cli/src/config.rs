//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The CLI
//! layer owns config; the core crate only sees the [`GatewayConfig`] slice.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `PYLON_<SECTION>__<KEY>`
//!    (e.g. `PYLON_RENDER__OUTPUT_DIR`, `PYLON_GATEWAY__SETTINGS__MODULE`)
//! 3. Config file (`--config`, else [`AppConfig::config_path`] if present)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use pylon_core::{
    application::{AssetDir, BuildPlan, GatewayConfig},
    domain::OutputMapping,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Request handling.
    pub gateway: GatewayConfig,
    /// Static export.
    pub render: RenderConfig,
    /// Site build (`pylon build`).
    pub build: BuildConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    /// File extensions that make up the template catalog.
    pub extensions: Vec<String>,
    /// Template name to output file name.
    pub overrides: OutputMapping,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("dist/public"),
            extensions: vec!["html".into()],
            overrides: OutputMapping::standard(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Remove the output directory first.
    pub clean: bool,
    /// Asset trees, relative to the working directory.
    pub assets: Vec<AssetDir>,
    /// Pages to warn about when absent after the build.
    pub expected_pages: Vec<String>,
    /// Title of the generated fallback home page.
    pub site_title: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        let plan = BuildPlan::new(PathBuf::new());
        Self {
            clean: plan.clean,
            assets: plan.assets,
            expected_pages: plan.expected_pages,
            site_title: plan.site_title,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl AppConfig {
    pub const ENV_PREFIX: &'static str = "PYLON";

    /// Load configuration from file and environment on top of the defaults.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        debug!(path = %path.display(), required, "Loading configuration");
        Self::load_from(&path, required)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let settings = Config::builder()
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("Configuration has invalid values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.pylon.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "pylon", "pylon")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".pylon.toml"))
    }
}
