use crate::cache::SharedCache;
use crate::endpoint::EndpointInfo;
use crate::fallback::{Dispatcher, FallbackError, FallbackSession, HopReport, LogicalCall};
use crate::monitor::MonitorRecorder;
use crate::registry::EndpointRegistry;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Resolves logical requests against the ranked endpoints, one candidate at a time.
///
/// Holds no per-call state; each call runs its own [`FallbackSession`].
#[derive(Clone)]
pub struct FallbackOrchestrator {
    registry: Arc<EndpointRegistry>,
    cache: Arc<dyn SharedCache>,
    dispatcher: Dispatcher,
    recorder: MonitorRecorder,
}

impl FallbackOrchestrator {
    pub fn new(
        registry: Arc<EndpointRegistry>,
        cache: Arc<dyn SharedCache>,
        dispatcher: Dispatcher,
        recorder: MonitorRecorder,
    ) -> Self {
        Self {
            registry,
            cache,
            dispatcher,
            recorder,
        }
    }

    pub async fn get(&self, path: &str, params: Vec<(String, String)>) -> Result<Value, FallbackError> {
        self.execute(LogicalCall::get(path, params)).await
    }

    pub async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, FallbackError> {
        self.execute(LogicalCall::post(path, body)).await
    }

    pub fn current_endpoint_info(&self) -> Option<EndpointInfo> {
        self.registry.current_endpoint_info()
    }

    pub async fn execute(&self, call: LogicalCall) -> Result<Value, FallbackError> {
        let mut session = FallbackSession::begin(self.registry.candidates()?)?;

        while let Some(endpoint) = session.current().cloned() {
            let attempt = session.attempt();
            let outcome = self
                .dispatcher
                .dispatch(&endpoint, &call, session.is_retry())
                .await;

            self.recorder
                .record_blocking(&endpoint, call.path(), outcome.to_monitor_outcome())
                .await;

            match outcome.result {
                Ok(payload) => {
                    session.accept();
                    info!(
                        event = "fallback_accepted",
                        endpoint = endpoint.name(),
                        path = call.path(),
                        attempt = attempt
                    );
                    return Ok(payload);
                }
                Err(failure) => {
                    warn!(
                        event = "fallback_hop_failed",
                        endpoint = endpoint.name(),
                        path = call.path(),
                        attempt = attempt,
                        reason = %failure
                    );

                    self.cache.clear();
                    self.registry.invalidate();

                    session.reject(HopReport {
                        endpoint: endpoint.name().to_string(),
                        failure,
                    });
                    session.advance();
                }
            }
        }

        warn!(
            event = "fallback_exhausted",
            path = call.path(),
            attempts = session.failures().len()
        );
        Err(session.into_error(call.path()))
    }
}

impl std::fmt::Debug for FallbackOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackOrchestrator")
            .field("registry", &self.registry)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
