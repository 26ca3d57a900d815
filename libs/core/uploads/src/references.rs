//! Lookups that keep shared uploads on disk.
//!
//! Records store image paths supplied by clients, so the same file can be
//! named by several admins, users, sellers or catalog entries. Before
//! [`UploadStore::discard`](crate::UploadStore::discard) unlinks a file it
//! asks an [`UploadReferences`] whether anything still points at it.

use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait UploadReferences: Send + Sync {
    /// True while any stored record names the upload `file_name`.
    /// Lookup failures must answer `true`.
    async fn is_referenced(&self, file_name: &str) -> bool;
}

/// Used until real lookups are installed: every file counts as referenced,
/// so nothing is ever deleted.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeReferenced;

#[async_trait]
impl UploadReferences for AssumeReferenced {
    async fn is_referenced(&self, _file_name: &str) -> bool {
        true
    }
}

/// Referenced when any member says so
#[derive(Clone, Default)]
pub struct ReferenceSet(Vec<Arc<dyn UploadReferences>>);

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: Arc<dyn UploadReferences>) -> Self {
        self.0.push(source);
        self
    }
}

#[async_trait]
impl UploadReferences for ReferenceSet {
    async fn is_referenced(&self, file_name: &str) -> bool {
        for source in &self.0 {
            if source.is_referenced(file_name).await {
                return true;
            }
        }
        false
    }
}

/// Whether a stored path or URL names `file_name`
pub fn points_to(reference: &str, file_name: &str) -> bool {
    reference.rsplit(['/', '\\']).next() == Some(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    #[async_trait]
    impl UploadReferences for Named {
        async fn is_referenced(&self, file_name: &str) -> bool {
            self.0 == file_name
        }
    }

    #[test]
    fn test_points_to_matches_last_segment_only() {
        assert!(points_to("uploads/image-1.png", "image-1.png"));
        assert!(points_to("http://localhost:8080/uploads/image-1.png", "image-1.png"));
        assert!(points_to("image-1.png", "image-1.png"));
        assert!(!points_to("uploads/image-11.png", "image-1.png"));
        assert!(!points_to("uploads/image-1.png.bak", "image-1.png"));
    }

    #[tokio::test]
    async fn test_reference_set_is_any() {
        let set = ReferenceSet::new()
            .with(Arc::new(Named("image-a.png")))
            .with(Arc::new(Named("image-b.png")));
        assert!(set.is_referenced("image-b.png").await);
        assert!(!set.is_referenced("image-c.png").await);
        assert!(!ReferenceSet::new().is_referenced("image-a.png").await);
        assert!(AssumeReferenced.is_referenced("image-a.png").await);
    }
}
