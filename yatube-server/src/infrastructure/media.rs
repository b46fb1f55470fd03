use std::path::{Component, Path, PathBuf};

use tracing::{error, info};
use uuid::Uuid;

use crate::domain::error::DomainError;

const POST_IMAGES_DIR: &str = "posts";

#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copies an uploaded file under the media root and returns the path a
    /// post stores, relative to that root.
    pub async fn save_post_image(
        &self,
        source: &Path,
        extension: &str,
    ) -> Result<String, DomainError> {
        let relative = format!("{}/{}.{}", POST_IMAGES_DIR, Uuid::new_v4(), extension);
        let dest = self.root.join(&relative);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                error!("failed to create media dir {}: {}", parent.display(), e);
                DomainError::Internal(e.to_string())
            })?;
        }
        tokio::fs::copy(source, &dest).await.map_err(|e| {
            error!("failed to store image {}: {}", dest.display(), e);
            DomainError::Internal(e.to_string())
        })?;

        info!(path = %relative, "image stored");
        Ok(relative)
    }

    /// Maps a relative media path to a file under the root. Absolute paths and
    /// `..` segments resolve to nothing.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let path = Path::new(relative);
        if relative.is_empty()
            || path
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_stays_inside_root() {
        let media = MediaStorage::new("/srv/media");
        assert_eq!(
            media.resolve("posts/a.gif"),
            Some(PathBuf::from("/srv/media/posts/a.gif"))
        );
        assert_eq!(media.resolve("../etc/passwd"), None);
        assert_eq!(media.resolve("posts/../../x"), None);
        assert_eq!(media.resolve("/etc/passwd"), None);
        assert_eq!(media.resolve(""), None);
    }

    #[tokio::test]
    async fn saved_images_land_under_posts() {
        let root = tempfile::tempdir().unwrap();
        let upload = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(upload.path(), b"GIF89a").unwrap();

        let media = MediaStorage::new(root.path());
        let stored = media.save_post_image(upload.path(), "gif").await.unwrap();

        assert!(stored.starts_with("posts/"));
        assert!(stored.ends_with(".gif"));
        let bytes = std::fs::read(media.resolve(&stored).unwrap()).unwrap();
        assert_eq!(bytes, b"GIF89a");
    }
}
