//! Blob store backend error types

use nimbus_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("part upload failed for {name}: {source}")]
    PartUpload {
        name: String,
        #[source]
        source: CloudError,
    },

    #[error("compose failed for {name}: {source}")]
    Compose {
        name: String,
        #[source]
        source: CloudError,
    },

    #[error("Cloud error: {0}")]
    Cloud(#[from] CloudError),
}

pub type Result<T> = std::result::Result<T, StorageError>;
