//! Blob store backend for the Nimbus provisioning core
//!
//! Large blobs go to the store in provider-legal slices: a [`ChunkPlan`]
//! fixes the part size and count for a byte length up front, the
//! [`MultipartUploader`] drives the parts through the upload / list /
//! compose protocol against the [`ObjectStore`] collaborator, and a
//! final compose stitches the parts into the destination object.
//!
//! Part objects are named `{upload_id}_{part_number:08}` so an
//! interrupted upload can be resumed (or aborted) by prefix listing
//! alone, without any server-side upload session.

pub mod chunk;
pub mod error;
pub mod multipart;
pub mod store;

// Re-exports
pub use chunk::{ChunkPlan, PartLimits};
pub use error::{Result, StorageError};
pub use multipart::MultipartUploader;
pub use store::{BlobDescriptor, ObjectStore, ObjectSummary, UploadPart};
