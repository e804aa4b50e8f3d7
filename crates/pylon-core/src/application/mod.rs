//! Application layer.
//!
//! Orchestrates the domain: the [`Gateway`] drives the request path and the
//! [`StaticRenderService`] drives the static export. External collaborators
//! are reached only through the traits in [`ports`].

mod config;
mod error;
pub mod ports;
mod services;

pub use config::{GatewayConfig, ServerConfig, Settings};
pub use error::ApplicationError;
pub use services::{
    AssetDir, BuildPlan, BuildReport, Gateway, RenderFailure, RenderReport, RequestAdapter,
    ResponseCollector, StaticRenderService, fallback_page,
};

pub use crate::domain::ResponseShape;
