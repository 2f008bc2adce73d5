mod candidates;
mod error;
mod service;


pub use candidates::CandidateList;
pub use error::RegistryError;
pub use service::EndpointRegistry;
