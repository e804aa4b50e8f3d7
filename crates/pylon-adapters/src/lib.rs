//! Infrastructure adapters for Pylon.
//!
//! This crate implements the ports defined in `pylon-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod renderer;
pub mod site;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::{DirectoryRenderer, InMemoryRenderer};
pub use site::{TemplateSite, TemplateSiteFactory};
