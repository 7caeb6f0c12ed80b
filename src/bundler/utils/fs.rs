//! File system utilities for addon emission.
//!
//! Thin wrappers over `tokio::fs` that attach the failing path to errors and
//! treat "already exists" as success where the operation is meant to be
//! idempotent.

use crate::bundler::error::{ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Returns true if `path` exists and is a regular file.
///
/// Errors while probing (for example permission denied on a parent) are
/// reported as "not a file".
pub async fn is_file(path: &Path) -> bool {
    match fs::metadata(path).await {
        Ok(metadata) => metadata.is_file(),
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                log::debug!("Could not stat {}: {}", path.display(), e);
            }
            false
        }
    }
}

/// Creates `path` and all of its missing parents.
///
/// Succeeds if the directory already exists.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .fs_context("creating output directory", path)
}

/// Writes `contents` to `path`, creating any parent directories as needed.
///
/// A failure part way through leaves at most a truncated file at `path`.
pub async fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).await?;
    }
    fs::write(path, contents)
        .await
        .fs_context("writing output file", path)
}

/// Reads the complete content of `path`.
pub async fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).await.fs_context("reading addon", path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b/c/out.node");

        write_file(&target, b"\x7fELF").await.unwrap();
        assert_eq!(read_file(&target).await.unwrap(), b"\x7fELF");
        assert!(is_file(&target).await);
    }

    #[tokio::test]
    async fn create_dir_all_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("dist");
        create_dir_all(&target).await.unwrap();
        create_dir_all(&target).await.unwrap();
        assert!(target.is_dir());
        assert!(!is_file(&target).await);
    }

    #[tokio::test]
    async fn missing_path_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_file(&dir.path().join("missing.node")).await);
    }
}
