//! Image uploads: disk storage, the multipart endpoint and static serving.
//!
//! Stored files are addressed by a relative public path (`uploads/<name>`).
//! [`UploadStore::asset_url`] turns such a path into the absolute URL clients load.

pub mod config;
pub mod error;
pub mod handlers;
pub mod references;
pub mod store;

pub use config::UploadConfig;
pub use error::{UploadError, UploadResult};
pub use handlers::{router, static_files};
pub use references::{AssumeReferenced, ReferenceSet, UploadReferences, points_to};
pub use store::{StoredFile, UploadStore};
