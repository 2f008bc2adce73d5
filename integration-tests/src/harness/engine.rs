use crate::harness::init_test_tracing;
use kortek_core::conf::KortekConfig;
use kortek_core::endpoint::{NewEndpoint, PersistedEndpoint};
use kortek_core::runtime::{Engine, build_engine};

/// Engine wired with the real HTTP transport and short timeouts.
pub struct TestEngine {
    pub engine: Engine,
    pub config: KortekConfig,
}

impl TestEngine {
    /// Builds an engine with no default endpoint; `configure` may override anything.
    pub fn start(configure: impl FnOnce(&mut KortekConfig)) -> Self {
        init_test_tracing();

        let mut config = KortekConfig::default();
        config.default_endpoint.enable = false;
        config.engine.connect_timeout_ms = 500;
        config.engine.read_timeout_ms = 1_000;
        config.health.timeout_ms = 500;
        configure(&mut config);

        let engine = build_engine(&config).expect("failed to build engine");
        Self { engine, config }
    }

    pub fn add(&self, name: &str, base_url: &str, priority: i32) -> PersistedEndpoint {
        self.engine
            .registry
            .create(NewEndpoint::new(name, base_url, priority))
            .expect("failed to register endpoint")
    }
}

/// A localhost port with nothing listening on it.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}
