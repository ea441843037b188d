//! Compute backend error types

use nimbus_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComputeError {
    #[error("Network not found: {0}")]
    NetworkNotFound(String),

    #[error("firewall provisioning failed for group {group}: {source}")]
    Provisioning {
        group: String,
        #[source]
        source: CloudError,
    },

    #[error("Cloud error: {0}")]
    Cloud(#[from] CloudError),
}

pub type Result<T> = std::result::Result<T, ComputeError>;
