//! Filesystem adapters used by the static export.
//!
//! [`LocalFilesystem`] writes to disk; [`MemoryFilesystem`] keeps everything
//! in a shared map so tests can inspect what was written.

mod local;
mod memory;

pub use local::LocalFilesystem;
pub use memory::MemoryFilesystem;
