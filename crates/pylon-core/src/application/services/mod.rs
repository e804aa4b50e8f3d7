//! Application services - orchestrate the domain through ports.

mod gateway;
mod request_adapter;
mod response_collector;
mod site_build;
mod static_render;

pub use gateway::Gateway;
pub use request_adapter::RequestAdapter;
pub use response_collector::ResponseCollector;
pub use site_build::{AssetDir, BuildPlan, BuildReport, fallback_page};
pub use static_render::{RenderFailure, RenderReport, StaticRenderService};
