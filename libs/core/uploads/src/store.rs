use crate::config::UploadConfig;
use crate::error::{UploadError, UploadResult};
use crate::references::{AssumeReferenced, UploadReferences};
use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

/// Public path segment files are served under.
pub const PUBLIC_PREFIX: &str = "uploads";

/// Extensions accepted by [`UploadStore::save`]. Content is not sniffed.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// What `POST /upload` reports back.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoredFile {
    #[schema(example = "image-17301234567891234.png")]
    pub filename: String,
    /// Relative public path, stored on records
    #[schema(example = "uploads/image-17301234567891234.png")]
    pub path: String,
    pub size: u64,
    #[schema(example = "http://localhost:8080/uploads/image-17301234567891234.png")]
    pub url: String,
}

/// Disk-backed store for uploaded images.
///
/// Until [`with_references`](Self::with_references) installs real lookups,
/// [`discard`](Self::discard) keeps every file.
#[derive(Clone)]
pub struct UploadStore {
    dir: PathBuf,
    base_url: String,
    references: Arc<dyn UploadReferences>,
}

impl fmt::Debug for UploadStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadStore")
            .field("dir", &self.dir)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl UploadStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            references: Arc::new(AssumeReferenced),
        }
    }

    pub fn with_references(mut self, references: Arc<dyn UploadReferences>) -> Self {
        self.references = references;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Expand a stored relative path to an absolute URL. Absolute URLs pass through.
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// [`asset_url`](Self::asset_url) for optional fields.
    pub fn asset_url_opt(&self, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty()).map(|p| self.asset_url(p))
    }

    /// Write `bytes` under a fresh `image-<millis><random>.<ext>` name.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> UploadResult<StoredFile> {
        let ext = allowed_extension(original_name)
            .ok_or_else(|| UploadError::UnsupportedType(original_name.to_string()))?;

        tokio::fs::create_dir_all(&self.dir).await?;

        let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
        let filename = format!("image-{}{}.{}", Utc::now().timestamp_millis(), suffix, ext);
        tokio::fs::write(self.dir.join(&filename), bytes).await?;

        let path = format!("{PUBLIC_PREFIX}/{filename}");
        info!(%filename, size = bytes.len(), "Upload stored");

        Ok(StoredFile {
            url: self.asset_url(&path),
            filename,
            path,
            size: bytes.len() as u64,
        })
    }

    /// The file name behind a path or URL this store handed out, if it is one.
    fn managed_name<'a>(&self, reference: &'a str) -> Option<&'a str> {
        let relative = reference
            .strip_prefix(self.base_url.as_str())
            .unwrap_or(reference)
            .trim_start_matches('/');
        let name = relative.strip_prefix(PUBLIC_PREFIX)?.strip_prefix('/')?;

        // Only names minted by `save`; shared assets like the default avatar stay put.
        let safe = name.starts_with("image-") && !name.contains(['/', '\\']);
        safe.then_some(name)
    }

    pub fn is_managed(&self, reference: &str) -> bool {
        self.managed_name(reference).is_some()
    }

    /// Remove an upload that no record points at any more. Call it after the
    /// owning record is gone or the write that would have referenced it failed.
    /// Best-effort: failures are logged, never returned.
    pub async fn discard(&self, reference: &str) -> bool {
        let Some(name) = self.managed_name(reference) else {
            debug!(reference, "Not a managed upload, nothing to discard");
            return false;
        };
        if self.references.is_referenced(name).await {
            debug!(file = name, "Upload still referenced, keeping it");
            return false;
        }

        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => {
                info!(file = name, "Discarded orphaned upload");
                true
            }
            Err(e) => {
                warn!(file = name, error = %e, "Failed to discard upload");
                false
            }
        }
    }
}

fn allowed_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::references::ReferenceSet;

    fn store(dir: &Path) -> UploadStore {
        UploadStore::new(&UploadConfig::new(dir, "http://localhost:8080/"))
            .with_references(Arc::new(ReferenceSet::new()))
    }

    struct Kept(&'static str);

    #[async_trait::async_trait]
    impl UploadReferences for Kept {
        async fn is_referenced(&self, file_name: &str) -> bool {
            self.0 == file_name
        }
    }

    #[test]
    fn test_allowed_extension() {
        assert_eq!(allowed_extension("cat.PNG").as_deref(), Some("png"));
        assert_eq!(allowed_extension("a.b.webp").as_deref(), Some("webp"));
        assert!(allowed_extension("script.svg").is_none());
        assert!(allowed_extension("noext").is_none());
    }

    #[test]
    fn test_asset_url() {
        let store = store(Path::new("/tmp"));
        assert_eq!(
            store.asset_url("uploads/user-default.png"),
            "http://localhost:8080/uploads/user-default.png"
        );
        assert_eq!(
            store.asset_url("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(store.asset_url_opt(Some("")), None);
    }

    #[tokio::test]
    async fn test_save_then_discard() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        let stored = store.save("Photo.JPG", b"not really a jpeg").await.unwrap();
        assert!(stored.filename.starts_with("image-"));
        assert!(stored.filename.ends_with(".jpg"));
        assert_eq!(stored.path, format!("uploads/{}", stored.filename));
        assert_eq!(stored.url, format!("http://localhost:8080/{}", stored.path));
        assert_eq!(stored.size, 17);
        assert!(tmp.path().join(&stored.filename).exists());

        assert!(store.discard(&stored.url).await);
        assert!(!tmp.path().join(&stored.filename).exists());
        assert!(!store.discard(&stored.path).await);
    }

    #[tokio::test]
    async fn test_discard_keeps_referenced_files() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("image-shared.png"), b"png").unwrap();
        std::fs::write(tmp.path().join("image-orphan.png"), b"png").unwrap();
        let store = UploadStore::new(&UploadConfig::new(tmp.path(), "http://localhost:8080"))
            .with_references(Arc::new(Kept("image-shared.png")));

        assert!(!store.discard("uploads/image-shared.png").await);
        assert!(tmp.path().join("image-shared.png").exists());
        assert!(store.discard("uploads/image-orphan.png").await);
        assert!(!tmp.path().join("image-orphan.png").exists());
    }

    #[tokio::test]
    async fn test_discard_without_lookups_keeps_everything() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("image-1.png"), b"png").unwrap();
        let store = UploadStore::new(&UploadConfig::new(tmp.path(), "http://localhost:8080"));

        assert!(!store.discard("uploads/image-1.png").await);
        assert!(tmp.path().join("image-1.png").exists());
    }

    #[tokio::test]
    async fn test_save_rejects_other_types() {
        let tmp = tempfile::tempdir().unwrap();
        let result = store(tmp.path()).save("notes.txt", b"hi").await;
        assert!(matches!(result, Err(UploadError::UnsupportedType(_))));
    }

    #[test]
    fn test_managed_paths_only() {
        let store = store(Path::new("/tmp"));
        assert!(store.is_managed("uploads/image-1.png"));
        assert!(store.is_managed("/uploads/image-1.png"));
        assert!(store.is_managed("http://localhost:8080/uploads/image-1.png"));
        assert!(!store.is_managed("https://elsewhere.com/uploads/image-1.png"));
        assert!(!store.is_managed("uploads/../secrets.env"));
        assert!(!store.is_managed("uploads/"));
        assert!(!store.is_managed("avatars/a.png"));
        assert!(!store.is_managed("uploads/user-default.png"));
    }
}
