//! Blob store collaborator interface

use async_trait::async_trait;
use nimbus_cloud::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;

/// Logical destination blob for a multipart upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobDescriptor {
    pub name: String,

    pub content_type: String,

    /// Total payload length in bytes
    pub length: u64,

    /// User metadata carried onto the composed object
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl BlobDescriptor {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, length: u64) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            length,
            metadata: HashMap::new(),
        }
    }
}

/// One successfully uploaded part object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPart {
    /// Object name of the part in the container
    pub name: String,

    /// 1-based position within the upload
    pub part_number: u64,

    pub size: u64,

    /// Opaque integrity token returned by the store
    pub entity_tag: String,
}

/// Minimal listing record for prefix scans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSummary {
    pub name: String,
    pub size: u64,
    pub entity_tag: String,
}

/// Blob store API surface consumed by the multipart coordinator
///
/// Implemented by the authenticated HTTP layer. The payload itself stays
/// on the transport side; the coordinator only names byte ranges of the
/// source stream.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `range` of the source payload as an independent object
    async fn upload_part(
        &self,
        container: &str,
        name: &str,
        content_type: &str,
        range: Range<u64>,
    ) -> Result<UploadPart>;

    /// Concatenate `parts` (in the given order) into `destination`,
    /// returning the composed object's entity tag
    async fn compose(
        &self,
        container: &str,
        destination: &BlobDescriptor,
        parts: &[UploadPart],
    ) -> Result<String>;

    async fn list_by_prefix(&self, container: &str, prefix: &str) -> Result<Vec<ObjectSummary>>;

    async fn delete_object(&self, container: &str, name: &str) -> Result<()>;
}
