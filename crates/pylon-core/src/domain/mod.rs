//! Core domain layer for Pylon.
//!
//! Plain values that cross the gateway: the canonical request, the environ
//! handed to the application, the collected response, and the render context
//! used by the static export.
//!
//! ## Rules
//!
//! - **No async**: everything is synchronous
//! - **No I/O** beyond in-memory streams
//! - **Immutable after construction**: `InboundRequest` has no setters
pub mod environ;
pub mod error;
pub mod headers;
pub mod host;
pub mod query;
pub mod render;
pub mod request;
pub mod response;

pub use environ::{Environ, ErrorStream, ProcessModel, header_key, keys};
pub use error::{DomainError, ErrorCategory};
pub use headers::HeaderMap;
pub use host::{HostRequest, HostResponse, Payload, RawHeaders, RequestObject, ResponseShape};
pub use query::{QueryParams, QueryValue};
pub use render::{OutputMapping, RenderContext, validate_output_name, validate_template_name};
pub use request::{InboundRequest, InboundRequestBuilder};
pub use response::{OutboundResponse, ResponseStatus, parse_status_code};
