//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pylon_core::domain::ResponseShape;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "pylon",
    bin_name = "pylon",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Serverless request gateway and static template export",
    long_about = "Pylon adapts host request events to the application calling \
                  convention, collects the response, and exports templates as \
                  static HTML.",
    after_help = "EXAMPLES:\n\
        \x20 pylon render-static -t templates -o dist/public\n\
        \x20 pylon build\n\
        \x20 pylon handle --event event.json --templates templates\n\
        \x20 echo '{\"path\": \"/about/\"}' | pylon handle --shape mapping\n\
        \x20 pylon config show",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render templates to static HTML files.
    #[command(
        name = "render-static",
        visible_alias = "render",
        about = "Render templates to static files",
        after_help = "EXAMPLES:\n\
            \x20 pylon render-static\n\
            \x20 pylon render-static -o public -t site/templates\n\
            \x20 pylon render-static home.html about.html"
    )]
    RenderStatic(RenderStaticArgs),

    /// Assemble a deployable static site.
    #[command(
        about = "Build the static site: clean, copy assets, render, verify",
        after_help = "EXAMPLES:\n\
            \x20 pylon build\n\
            \x20 pylon build -o public --no-clean"
    )]
    Build(BuildArgs),

    /// Run one host event through the gateway.
    #[command(
        about = "Handle one request event",
        after_help = "EXAMPLES:\n\
            \x20 pylon handle --event event.json\n\
            \x20 pylon handle --templates templates --shape mapping < event.json"
    )]
    Handle(HandleArgs),

    /// Inspect the effective configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 pylon config show\n\
            \x20 pylon config path"
    )]
    Config(ConfigCommands),
}

// ── render-static ─────────────────────────────────────────────────────────────

/// Arguments for `pylon render-static`.
#[derive(Debug, Args)]
pub struct RenderStaticArgs {
    /// Templates to render. Defaults to every template in the directory.
    #[arg(value_name = "TEMPLATE", help = "Template names (default: all)")]
    pub names: Vec<String>,

    /// Output directory.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: dist/public)"
    )]
    pub output: Option<PathBuf>,

    /// Template directory.
    #[arg(
        short = 't',
        long = "templates",
        value_name = "DIR",
        help = "Template directory (default: templates)"
    )]
    pub templates: Option<PathBuf>,
}

// ── build ─────────────────────────────────────────────────────────────────────

/// Arguments for `pylon build`.
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Output directory.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: dist/public)"
    )]
    pub output: Option<PathBuf>,

    /// Template directory.
    #[arg(
        short = 't',
        long = "templates",
        value_name = "DIR",
        help = "Template directory (default: templates)"
    )]
    pub templates: Option<PathBuf>,

    /// Keep existing output instead of removing it first.
    #[arg(long = "no-clean", help = "Do not remove the output directory first")]
    pub no_clean: bool,
}

// ── handle ────────────────────────────────────────────────────────────────────

/// Arguments for `pylon handle`.
#[derive(Debug, Args)]
pub struct HandleArgs {
    /// JSON event file; `-` or omitted reads stdin.
    #[arg(
        short = 'e',
        long = "event",
        value_name = "FILE",
        help = "Event JSON file (default: stdin)"
    )]
    pub event: Option<PathBuf>,

    /// Template directory served by the site application.
    #[arg(
        short = 't',
        long = "templates",
        value_name = "DIR",
        help = "Template directory for the site application"
    )]
    pub templates: Option<PathBuf>,

    /// Settings selector passed to the application factory.
    #[arg(
        long = "settings",
        value_name = "MODULE",
        help = "Settings module (default: site.settings)"
    )]
    pub settings: Option<String>,

    /// Shape of the printed response.
    #[arg(long = "shape", value_enum, help = "Response shape")]
    pub shape: Option<ShapeArg>,
}

/// Response shape as a CLI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShapeArg {
    /// An HTTP/1.1 style message.
    Structured,
    /// A `statusCode` / `headers` / `body` JSON object.
    Mapping,
}

impl From<ShapeArg> for ResponseShape {
    fn from(shape: ShapeArg) -> Self {
        match shape {
            ShapeArg::Structured => Self::Structured,
            ShapeArg::Mapping => Self::Mapping,
        }
    }
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `pylon config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML.
    Show,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
