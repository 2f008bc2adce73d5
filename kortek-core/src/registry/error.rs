use crate::endpoint::{EndpointId, EndpointUrlError};
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("endpoint {0} not found")]
    NotFound(EndpointId),

    #[error("invalid endpoint: {0}")]
    Invalid(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<EndpointUrlError> for RegistryError {
    fn from(err: EndpointUrlError) -> Self {
        RegistryError::Invalid(err.to_string())
    }
}
