pub mod engine;
pub mod tracing;
pub mod upstream;

pub use engine::{TestEngine, free_port};
pub use tracing::{CapturedEvent, captured_events, init_test_tracing};
pub use upstream::{CannedResponse, RecordedRequest, TestUpstream};
