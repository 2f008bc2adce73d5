use crate::endpoint::{Endpoint, join_path};
use crate::fallback::HopFailure;
use crate::monitor::MonitorOutcome;
use crate::response::{ResponseValidator, Verdict};
use crate::transport::{UpstreamRequest, UpstreamResponse, UpstreamTransport};
use http::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A request expressed against a logical path, independent of which endpoint serves it.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalCall {
    Get {
        path: String,
        params: Vec<(String, String)>,
    },
    Post {
        path: String,
        body: Option<Value>,
    },
}

impl LogicalCall {
    pub fn get(path: impl Into<String>, params: Vec<(String, String)>) -> Self {
        LogicalCall::Get {
            path: path.into(),
            params,
        }
    }

    pub fn post(path: impl Into<String>, body: Option<Value>) -> Self {
        LogicalCall::Post {
            path: path.into(),
            body,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            LogicalCall::Get { path, .. } | LogicalCall::Post { path, .. } => path,
        }
    }
}

/// Result of one attempt against one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct HopOutcome {
    /// Unset when no response arrived.
    pub latency: Option<Duration>,
    pub body: Option<String>,
    pub result: Result<Value, HopFailure>,
}

impl HopOutcome {
    pub fn to_monitor_outcome(&self) -> MonitorOutcome {
        match &self.result {
            Ok(_) => MonitorOutcome::up(self.latency.unwrap_or_default(), self.body.clone()),
            Err(failure) => MonitorOutcome::failed(failure.monitor_status(), failure.to_string())
                .with_latency(self.latency)
                .with_snippet(self.body.clone()),
        }
    }
}

/// Issues single attempts and judges their responses.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn UpstreamTransport>,
    validator: ResponseValidator,
    timeout: Duration,
    bypass_param: String,
}

impl Dispatcher {
    pub fn new(
        transport: Arc<dyn UpstreamTransport>,
        validator: ResponseValidator,
        timeout: Duration,
        bypass_param: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            validator,
            timeout,
            bypass_param: bypass_param.into(),
        }
    }

    /// Builds the outbound request. `bypass` marks a retry, which asks the
    /// provider to skip its own cache.
    pub fn build_request(&self, endpoint: &Endpoint, call: &LogicalCall, bypass: bool) -> UpstreamRequest {
        let url = join_path(endpoint.url(), call.path());
        let flag = || (self.bypass_param.clone(), "true".to_string());

        match call {
            LogicalCall::Get { params, .. } => {
                let mut query = params.clone();
                if bypass {
                    query.push(flag());
                }
                UpstreamRequest {
                    method: Method::GET,
                    url,
                    query,
                    body: None,
                    timeout: self.timeout,
                }
            }
            LogicalCall::Post { body, .. } => {
                let mut query = Vec::new();
                let body = match (body.clone(), bypass) {
                    (body, false) => body,
                    (Some(Value::Object(mut map)), true) => {
                        map.insert(self.bypass_param.clone(), Value::Bool(true));
                        Some(Value::Object(map))
                    }
                    (None, true) => {
                        let mut map = serde_json::Map::new();
                        map.insert(self.bypass_param.clone(), Value::Bool(true));
                        Some(Value::Object(map))
                    }
                    (Some(other), true) => {
                        query.push(flag());
                        Some(other)
                    }
                };
                UpstreamRequest {
                    method: Method::POST,
                    url,
                    query,
                    body,
                    timeout: self.timeout,
                }
            }
        }
    }

    pub async fn dispatch(&self, endpoint: &Endpoint, call: &LogicalCall, bypass: bool) -> HopOutcome {
        let request = self.build_request(endpoint, call, bypass);
        let started = Instant::now();

        match self.transport.send(request).await {
            Ok(response) => {
                let latency = started.elapsed();
                let result = self.interpret(&response);
                HopOutcome {
                    latency: Some(latency),
                    body: Some(response.body),
                    result,
                }
            }
            Err(e) => HopOutcome {
                latency: None,
                body: None,
                result: Err(HopFailure::Transport(e)),
            },
        }
    }

    fn interpret(&self, response: &UpstreamResponse) -> Result<Value, HopFailure> {
        if !response.status.is_success() {
            return Err(HopFailure::HttpStatus(response.status.as_u16()));
        }

        // An empty 2xx body is judged by the validator, not treated as malformed.
        let payload = if response.body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&response.body)
                .map_err(|e| HopFailure::MalformedBody(e.to_string()))?
        };

        match self.validator.accept(payload) {
            Verdict::Accept(normalized) => Ok(normalized),
            Verdict::Reject(rejection) => Err(HopFailure::LowConfidence(rejection)),
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("validator", &self.validator)
            .field("timeout", &self.timeout)
            .field("bypass_param", &self.bypass_param)
            .finish_non_exhaustive()
    }
}
