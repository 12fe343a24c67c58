//! The file-system layer: every read, write, listing and delete goes through
//! here so failures carry the path they happened on.

use std::path::{Path, PathBuf};

use spdlog::debug;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{PublishError, Result};

const POST_EXTENSION: &str = ".md";

pub async fn read_file(path: &Path) -> Result<String> {
    debug!("Reading {}", path.display());
    fs::read_to_string(path).await.map_err(|e| PublishError::io(path, e))
}

/// Like [`read_file`], but a missing file is `None`.
pub async fn read_file_if_exists(path: &Path) -> Result<Option<String>> {
    match read_file(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Writes `contents` to `path`, creating the parent directories first.
pub async fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(|e| PublishError::io(parent, e))?;
    }
    debug!("Writing {}", path.display());
    fs::write(path, contents).await.map_err(|e| PublishError::io(path, e))
}

/// Like [`write_file`], but fails with `AlreadyExists` instead of replacing
/// an existing file.
pub async fn create_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(|e| PublishError::io(parent, e))?;
    }
    debug!("Creating {}", path.display());
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|e| PublishError::io(path, e))?;
    file.write_all(contents.as_ref()).await.map_err(|e| PublishError::io(path, e))?;
    file.flush().await.map_err(|e| PublishError::io(path, e))
}

pub async fn delete_file(path: &Path) -> Result<()> {
    debug!("Deleting {}", path.display());
    fs::remove_file(path).await.map_err(|e| PublishError::io(path, e))
}

/// Removes `dir` and everything below it. A missing directory is fine.
pub async fn remove_dir(dir: &Path) -> Result<()> {
    debug!("Removing {}", dir.display());
    match fs::remove_dir_all(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PublishError::io(dir, e)),
    }
}

fn is_post_file(file_name: &str) -> bool {
    let is_hidden = file_name.starts_with('.');
    let is_backup = file_name.ends_with('~');
    let is_buffer = file_name.starts_with('#') && file_name.ends_with('#');

    file_name.ends_with(POST_EXTENSION) && !is_hidden && !is_backup && !is_buffer
}

/// Names of the post files in `dir`, sorted.
pub async fn read_dir(dir: &Path) -> Result<Vec<String>> {
    let mut entries = fs::read_dir(dir).await.map_err(|e| PublishError::io(dir, e))?;
    let mut names = vec![];

    while let Some(entry) = entries.next_entry().await.map_err(|e| PublishError::io(dir, e))? {
        let file_type = entry.file_type().await.map_err(|e| PublishError::io(&entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }
        if let Some(file_name) = entry.file_name().to_str() {
            if is_post_file(file_name) {
                names.push(file_name.to_string());
            }
        }
    }

    names.sort();
    Ok(names)
}

/// Full paths of the post files in `dir`. A missing directory has no posts.
pub async fn list_posts(dir: &Path) -> Result<Vec<PathBuf>> {
    match read_dir(dir).await {
        Ok(names) => Ok(names.into_iter().map(|name| dir.join(name)).collect()),
        Err(e) if e.is_not_found() => Ok(vec![]),
        Err(e) => Err(e),
    }
}
