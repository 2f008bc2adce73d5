pub mod cache;
pub mod cli;
pub mod conf;
pub mod endpoint;
pub mod fallback;
pub mod health;
pub mod logging;
pub mod monitor;
pub mod registry;
pub mod response;
pub mod runtime;
pub mod source_domain;
pub mod status;
pub mod store;
pub mod transport;

#[cfg(test)]
mod test_support;
