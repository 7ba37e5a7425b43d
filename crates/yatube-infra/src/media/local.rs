//! Filesystem-backed storage for uploaded post images.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use slug::slugify;
use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

use yatube_core::ports::{MediaStorage, StorageError};

/// Stores files under a root directory and serves them from `base_url`.
#[derive(Debug, Clone)]
pub struct LocalMediaStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStorage {
    /// Storage rooted at `root`, creating it if necessary.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Result<Self, StorageError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;

        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self { root, base_url })
    }

    /// Absolute path of a stored file; rejects anything escaping the root.
    fn resolve(&self, stored_path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(stored_path);
        if stored_path.is_empty()
            || relative.is_absolute()
            || relative.components().any(|component| {
                matches!(
                    component,
                    Component::ParentDir | Component::RootDir | Component::Prefix(_)
                )
            })
        {
            return Err(StorageError::InvalidPath(stored_path.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn save(
        &self,
        directory: &str,
        filename: &str,
        content: &[u8],
    ) -> Result<String, StorageError> {
        let dir = self.resolve(directory)?;
        fs::create_dir_all(&dir).await?;

        let (stem, extension) = sanitize_filename(filename);
        let mut name = join_name(&stem, extension.as_deref());

        loop {
            let target = dir.join(&name);
            // create_new refuses to clobber a file uploaded under the same name
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&target)
                .await
            {
                Ok(mut file) => {
                    file.write_all(content).await?;
                    file.flush().await?;
                    break;
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    let suffix = Uuid::new_v4().simple().to_string();
                    name = join_name(&format!("{stem}_{}", &suffix[..7]), extension.as_deref());
                }
                Err(e) => return Err(e.into()),
            }
        }

        let stored = format!("{}/{name}", directory.trim_end_matches('/'));
        tracing::debug!(path = %stored, bytes = content.len(), "Media file stored");
        Ok(stored)
    }

    async fn open(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let absolute = self.resolve(path)?;
        match fs::read(&absolute).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let absolute = self.resolve(path)?;
        match fs::remove_file(&absolute).await {
            Ok(()) => {
                tracing::debug!(path = %path, "Media file removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Split an uploaded name into a safe stem and lowercase extension.
fn sanitize_filename(original: &str) -> (String, Option<String>) {
    let path = Path::new(original);
    let stem = path
        .file_stem()
        .and_then(|value| value.to_str())
        .map(slugify)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "upload".to_string());

    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.trim_matches('.').to_ascii_lowercase())
        .filter(|value| !value.is_empty());

    (stem, extension)
}

fn join_name(stem: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem.to_string(),
    }
}
