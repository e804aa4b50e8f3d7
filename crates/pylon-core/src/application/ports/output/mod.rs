//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the static export needs from external systems.
//! The `pylon-adapters` crate provides implementations.

use crate::domain::RenderContext;
use crate::error::PylonResult;
use std::path::{Path, PathBuf};

/// Port for filesystem operations.
///
/// Implemented by:
/// - `pylon_adapters::filesystem::LocalFilesystem` (production)
/// - `pylon_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> PylonResult<()>;

    /// Write UTF-8 content to a file, replacing any previous content.
    fn write_file(&self, path: &Path, content: &str) -> PylonResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and everything under it. A missing directory is
    /// not an error.
    fn remove_dir_all(&self, path: &Path) -> PylonResult<()>;

    /// Copy one file, replacing `to` if it exists. The parent of `to` must
    /// exist.
    fn copy_file(&self, from: &Path, to: &Path) -> PylonResult<()>;

    /// Every file below `dir`, recursively, relative to `dir` and sorted.
    fn files_under(&self, dir: &Path) -> PylonResult<Vec<PathBuf>>;
}

/// Port for the template-rendering collaborator.
///
/// Implemented by:
/// - `pylon_adapters::renderer::DirectoryRenderer` (templates on disk)
/// - `pylon_adapters::renderer::InMemoryRenderer` (tests, demos)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Names of every template this renderer can export.
    fn templates(&self) -> PylonResult<Vec<String>>;

    /// Render one template to text.
    ///
    /// # Arguments
    ///
    /// * `name` - Template name relative to the renderer's root
    /// * `context` - Variables; the static export passes an empty context
    fn render(&self, name: &str, context: &RenderContext) -> PylonResult<String>;
}
