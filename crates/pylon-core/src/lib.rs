//! Pylon Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Pylon
//! serverless gateway, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │   serverless host / pylon-cli (driver)  │
//! └──────────────────┬──────────────────────┘
//!                    │ HostRequest
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  Gateway → RequestAdapter → Collector   │
//! │        StaticRenderService              │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ Application, ApplicationFactory,        │
//! │ TemplateRenderer, Filesystem            │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   pylon-adapters (Infrastructure)       │
//! │ LocalFilesystem, DirectoryRenderer, ... │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Values)           │
//! │ InboundRequest, Environ, HeaderMap,     │
//! │ OutboundResponse, RenderContext         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pylon_core::prelude::*;
//!
//! # fn factory() -> Box<dyn ApplicationFactory> { unimplemented!() }
//! let gateway = Gateway::new(GatewayConfig::default(), factory());
//!
//! let request = HostRequest::from_json(serde_json::json!({
//!     "method": "GET",
//!     "url": "https://example.com/about?x=1",
//!     "headers": { "host": "example.com" },
//! }));
//!
//! let response = gateway.handle(request);
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        AssetDir, BuildPlan, BuildReport, Gateway, GatewayConfig, RenderReport, RequestAdapter,
        ResponseCollector, ResponseShape, Settings, StaticRenderService,
        ports::{
            Application, ApplicationFactory, BoxError, Chunk, ChunkBody, Filesystem,
            ResponseBody, StartResponse, TemplateRenderer,
        },
    };
    pub use crate::domain::{
        Environ, HeaderMap, HostRequest, HostResponse, InboundRequest, OutboundResponse,
        OutputMapping, Payload, QueryParams, RenderContext, RequestObject,
    };
    pub use crate::error::{PylonError, PylonResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
