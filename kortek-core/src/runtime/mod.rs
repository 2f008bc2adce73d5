mod engine;
mod error;

pub use engine::{Engine, build_engine};
pub use error::RuntimeError;

#[cfg(test)]
mod tests;
