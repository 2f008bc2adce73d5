mod orchestrator_tests;

use crate::fallback::{Dispatcher, FallbackOrchestrator};
use crate::monitor::MonitorRecorder;
use crate::response::ResponseValidator;
use crate::test_support::{Fixture, ScriptedTransport};
use std::sync::Arc;
use std::time::Duration;

pub(super) fn dispatcher(transport: Arc<ScriptedTransport>) -> Dispatcher {
    Dispatcher::new(
        transport,
        ResponseValidator::default(),
        Duration::from_secs(1),
        "force_refresh",
    )
}

pub(super) fn orchestrator(fx: &Fixture, transport: Arc<ScriptedTransport>) -> FallbackOrchestrator {
    FallbackOrchestrator::new(
        fx.registry.clone(),
        fx.cache.clone(),
        dispatcher(transport),
        MonitorRecorder::new(fx.store.clone()),
    )
}
