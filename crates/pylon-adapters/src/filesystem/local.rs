//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use pylon_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{PylonError, PylonResult},
};
use tracing::debug;
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> PylonResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> PylonResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))?;
        debug!(path = %path.display(), bytes = content.len(), "File written");
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> PylonResult<()> {
        match std::fs::remove_dir_all(path) {
            Ok(()) => {
                debug!(path = %path.display(), "Directory removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io_error(path, e, "remove directory")),
        }
    }

    fn copy_file(&self, from: &Path, to: &Path) -> PylonResult<()> {
        let bytes = std::fs::copy(from, to).map_err(|e| map_io_error(from, e, "copy file"))?;
        debug!(from = %from.display(), to = %to.display(), bytes, "File copied");
        Ok(())
    }

    fn files_under(&self, dir: &Path) -> PylonResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                let reason = format!("Failed to walk directory: {e}");
                PylonError::from(ApplicationError::FilesystemError { path, reason })
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(dir) {
                files.push(relative.to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> PylonError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_visible_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        let nested = dir.path().join("public/blog");

        fs.create_dir_all(&nested).unwrap();
        fs.write_file(&nested.join("post.html"), "<p>é</p>").unwrap();

        assert!(fs.exists(&nested.join("post.html")));
        assert_eq!(
            std::fs::read_to_string(nested.join("post.html")).unwrap(),
            "<p>é</p>"
        );
    }

    #[test]
    fn files_under_lists_nested_files_relative() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("static");
        std::fs::create_dir_all(root.join("css")).unwrap();
        std::fs::create_dir_all(root.join("js/vendor")).unwrap();
        std::fs::write(root.join("css/style.css"), "body{}").unwrap();
        std::fs::write(root.join("js/vendor/lib.js"), "").unwrap();
        std::fs::write(root.join("robots.txt"), "").unwrap();

        let files = LocalFilesystem::new().files_under(&root).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("css/style.css"),
                PathBuf::from("js/vendor/lib.js"),
                PathBuf::from("robots.txt"),
            ]
        );
    }

    #[test]
    fn copy_file_keeps_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("logo.png");
        std::fs::write(&from, [0x89, b'P', b'N', b'G', 0xff]).unwrap();

        let to = dir.path().join("copy.png");
        LocalFilesystem::new().copy_file(&from, &to).unwrap();
        assert_eq!(std::fs::read(&to).unwrap(), vec![0x89, b'P', b'N', b'G', 0xff]);
    }

    #[test]
    fn remove_dir_all_tolerates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        let target = dir.path().join("dist");

        fs.remove_dir_all(&target).unwrap();

        std::fs::create_dir_all(target.join("public")).unwrap();
        std::fs::write(target.join("public/index.html"), "old").unwrap();
        fs.remove_dir_all(&target).unwrap();
        assert!(!fs.exists(&target));
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalFilesystem::new()
            .write_file(&dir.path().join("missing/file.html"), "x")
            .unwrap_err();
        assert!(matches!(
            err,
            PylonError::Application(ApplicationError::FilesystemError { .. })
        ));
    }
}
