//! Template renderers.

mod directory;
mod memory;
mod syntax;

pub use directory::DirectoryRenderer;
pub use memory::InMemoryRenderer;
pub use syntax::MAX_INCLUDE_DEPTH;
