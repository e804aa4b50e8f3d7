//! Application ports (traits) for external collaborators.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `pylon-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Calling convention**: the application callable the gateway drives
//!   - `Application`, `StartResponse`, `ResponseBody`, `ApplicationFactory`
//!
//! - **Driven (Output) Ports**: called by the static export
//!   - `Filesystem`: File operations
//!   - `TemplateRenderer`: Template rendering

pub mod calling;
pub mod output;

pub use calling::{
    AppResult, Application, ApplicationFactory, BoxError, Chunk, ChunkBody, ResponseBody,
    StartResponse,
};
pub use output::{Filesystem, TemplateRenderer};
