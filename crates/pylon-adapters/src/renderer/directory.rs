//! Renderer backed by a directory of template files.

use std::io;
use std::path::{Path, PathBuf};

use pylon_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::RenderContext,
    error::{PylonError, PylonResult},
};
use tracing::{debug, instrument};
use walkdir::WalkDir;

use super::syntax;

/// Templates are files under `root`.
///
/// The catalog is the files directly in `root` whose extension is one of
/// `extensions`; includes may reach into subdirectories.
#[derive(Debug, Clone)]
pub struct DirectoryRenderer {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryRenderer {
    pub const DEFAULT_EXTENSION: &'static str = "html";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: vec![Self::DEFAULT_EXTENSION.to_string()],
        }
    }

    /// Replace the catalog extensions. Leading dots are ignored.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load(&self, name: &str) -> PylonResult<String> {
        let path = self.root.join(name);
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ApplicationError::TemplateNotFound {
                name: name.to_string(),
            }
            .into(),
            _ => PylonError::from(ApplicationError::FilesystemError {
                path,
                reason: format!("Failed to read template: {e}"),
            }),
        })
    }

    fn in_catalog(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

impl TemplateRenderer for DirectoryRenderer {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn templates(&self) -> PylonResult<Vec<String>> {
        if !self.root.is_dir() {
            return Err(ApplicationError::FilesystemError {
                path: self.root.clone(),
                reason: "Template directory does not exist".into(),
            }
            .into());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: e.path().map_or_else(|| self.root.clone(), Path::to_path_buf),
                reason: format!("Failed to list templates: {e}"),
            })?;

            if entry.file_type().is_file() && self.in_catalog(entry.path()) {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                } else {
                    debug!(path = %entry.path().display(), "Skipping non UTF-8 template name");
                }
            }
        }

        names.sort();
        debug!(count = names.len(), "Template catalog listed");
        Ok(names)
    }

    #[instrument(skip(self, context), fields(root = %self.root.display()))]
    fn render(&self, name: &str, context: &RenderContext) -> PylonResult<String> {
        syntax::render(name, context, &|n: &str| self.load(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("home.html"), "{% include \"partials/nav.html\" %}home").unwrap();
        std::fs::write(dir.path().join("about.html"), "about").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a page").unwrap();
        std::fs::create_dir(dir.path().join("partials")).unwrap();
        std::fs::write(dir.path().join("partials/nav.html"), "<nav/>").unwrap();
        dir
    }

    #[test]
    fn catalog_lists_top_level_html_only() {
        let dir = site();
        let renderer = DirectoryRenderer::new(dir.path());
        assert_eq!(renderer.templates().unwrap(), vec!["about.html", "home.html"]);
    }

    #[test]
    fn custom_extensions() {
        let dir = site();
        let renderer = DirectoryRenderer::new(dir.path()).with_extensions([".txt"]);
        assert_eq!(renderer.templates().unwrap(), vec!["notes.txt"]);
    }

    #[test]
    fn renders_includes_from_subdirectories() {
        let dir = site();
        let renderer = DirectoryRenderer::new(dir.path());
        assert_eq!(
            renderer.render("home.html", &RenderContext::empty()).unwrap(),
            "<nav/>home"
        );
    }

    #[test]
    fn missing_template_is_not_found() {
        let dir = site();
        let err = DirectoryRenderer::new(dir.path())
            .render("missing.html", &RenderContext::empty())
            .unwrap_err();
        assert!(matches!(
            err,
            PylonError::Application(ApplicationError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn missing_root_fails_listing() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = DirectoryRenderer::new(dir.path().join("absent"));
        assert!(renderer.templates().is_err());
    }
}
