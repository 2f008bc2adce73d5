mod dispatch;
mod error;
mod orchestrator;
mod session;

#[cfg(test)]
mod tests;

pub use dispatch::*;
pub use error::*;
pub use orchestrator::FallbackOrchestrator;
pub use session::{FallbackSession, SessionState};
