use crate::registry::RegistryError;
use crate::store::StoreError;
use crate::transport::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("failed to open endpoint store")]
    Store(#[from] StoreError),

    #[error("failed to seed endpoint registry")]
    Seed(#[from] RegistryError),

    #[error("failed to build http client")]
    Transport(#[from] TransportError),

    #[error("default endpoint is invalid: {0}")]
    DefaultEndpoint(String),
}
