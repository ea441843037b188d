//! Multipart upload coordination
//!
//! Drives a [`ChunkPlan`] through the upload-part / list-parts /
//! compose protocol. Every part is an independent object named
//! `{upload_id}_{part_number:08}`; the final compose concatenates them
//! in ascending part order into the destination blob. Nothing is
//! session-scoped on the server, so resumption and abort both work by
//! prefix listing.

use crate::chunk::ChunkPlan;
use crate::error::{Result, StorageError};
use crate::store::{BlobDescriptor, ObjectStore, UploadPart};
use std::sync::Arc;
use uuid::Uuid;

/// Coordinates one multipart upload against the blob store
pub struct MultipartUploader {
    store: Arc<dyn ObjectStore>,
    upload_id: String,
}

impl MultipartUploader {
    /// Start a fresh upload for `blob_name`.
    ///
    /// The upload id gets a random discriminator so concurrent uploads
    /// of the same blob never collide on part names.
    pub fn new(store: Arc<dyn ObjectStore>, blob_name: &str) -> Self {
        let upload_id = format!("{}-{}", blob_name, Uuid::new_v4().simple());
        Self::resume(store, upload_id)
    }

    /// Attach to an existing upload id (for resumption or abort)
    pub fn resume(store: Arc<dyn ObjectStore>, upload_id: impl Into<String>) -> Self {
        Self { store, upload_id: upload_id.into() }
    }

    pub fn upload_id(&self) -> &str {
        &self.upload_id
    }

    fn part_name(&self, part_number: u64) -> String {
        format!("{}_{:08}", self.upload_id, part_number)
    }

    fn part_prefix(&self) -> String {
        format!("{}_", self.upload_id)
    }

    /// Upload every part of `plan` and compose them into `blob`.
    ///
    /// Returns the composed object's entity tag. Parts are uploaded
    /// sequentially; a part failure aborts the call without deleting
    /// already-uploaded parts, so the caller can [`resume`](Self::resume)
    /// or [`abort`](Self::abort) later.
    pub async fn upload(
        &self,
        container: &str,
        blob: &BlobDescriptor,
        plan: &ChunkPlan,
    ) -> Result<String> {
        debug_assert_eq!(plan.covered_length(), blob.length);

        let mut parts = Vec::with_capacity(plan.part_count as usize);
        for part_number in 1..=plan.part_count {
            let name = self.part_name(part_number);
            let range = plan.byte_range(part_number);
            tracing::debug!(
                "uploading part {part_number}/{} as {name} ({} bytes)",
                plan.part_count,
                range.end - range.start
            );
            let part = self
                .store
                .upload_part(container, &name, &blob.content_type, range)
                .await
                .map_err(|source| StorageError::PartUpload { name, source })?;
            parts.push(part);
        }

        parts.sort_by_key(|part| part.part_number);
        let entity_tag = self
            .store
            .compose(container, blob, &parts)
            .await
            .map_err(|source| StorageError::Compose { name: blob.name.clone(), source })?;

        tracing::info!(
            "composed {} parts into {} (etag {entity_tag})",
            parts.len(),
            blob.name
        );
        Ok(entity_tag)
    }

    /// Delete every already-uploaded part of this upload, best-effort.
    ///
    /// Individual deletion failures are logged and skipped; a part may
    /// already be gone or mid-deletion.
    pub async fn abort(&self, container: &str) -> Result<()> {
        let summaries = self
            .store
            .list_by_prefix(container, &self.part_prefix())
            .await?;

        tracing::info!(
            "aborting upload {}: deleting {} parts",
            self.upload_id,
            summaries.len()
        );
        for summary in summaries {
            if let Err(e) = self.store.delete_object(container, &summary.name).await {
                tracing::warn!("failed to delete part {}: {e}", summary.name);
            }
        }
        Ok(())
    }

    /// Parts already uploaded under this upload id, in ascending order.
    ///
    /// Objects whose suffix after the last underscore is not a part
    /// number are ignored.
    pub async fn list_parts(&self, container: &str) -> Result<Vec<UploadPart>> {
        let summaries = self
            .store
            .list_by_prefix(container, &self.part_prefix())
            .await?;

        let mut parts: Vec<UploadPart> = summaries
            .into_iter()
            .filter_map(|summary| {
                let part_number = parse_part_number(&summary.name)?;
                Some(UploadPart {
                    name: summary.name,
                    part_number,
                    size: summary.size,
                    entity_tag: summary.entity_tag,
                })
            })
            .collect();
        parts.sort_by_key(|part| part.part_number);
        Ok(parts)
    }
}

/// Parse the 1-based part number from the suffix after the last underscore
fn parse_part_number(name: &str) -> Option<u64> {
    let (_, suffix) = name.rsplit_once('_')?;
    suffix.parse().ok()
}
