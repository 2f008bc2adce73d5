use crate::cache::{MemoryCache, SharedCache};
use crate::conf::{DefaultEndpointConfig, KortekConfig};
use crate::endpoint::{DefaultEndpoint, normalize_base_url};
use crate::fallback::{Dispatcher, FallbackOrchestrator};
use crate::health::{HealthProber, HealthSweep};
use crate::monitor::MonitorRecorder;
use crate::registry::EndpointRegistry;
use crate::response::ResponseValidator;
use crate::runtime::RuntimeError;
use crate::status::StatusChecker;
use crate::store::{EndpointStore, MemoryStore};
use crate::transport::{HttpTransport, UpstreamTransport};
use std::sync::Arc;

/// Every engine component, wired from one configuration.
#[derive(Debug)]
pub struct Engine {
    pub registry: Arc<EndpointRegistry>,
    pub orchestrator: FallbackOrchestrator,
    pub recorder: MonitorRecorder,
    pub prober: HealthProber,
    pub sweep: HealthSweep,
    pub status: StatusChecker,
}

/// Opens the configured store, builds the HTTP transport and seeds the registry.
pub fn build_engine(cfg: &KortekConfig) -> Result<Engine, RuntimeError> {
    let store = open_store(cfg)?;
    let transport = Arc::new(HttpTransport::new(
        cfg.engine.connect_timeout(),
        &cfg.engine.user_agent,
    )?);

    Engine::assemble(cfg, store, Arc::new(MemoryCache::new()), transport)
}

#[cfg(feature = "sqlite")]
fn open_store(cfg: &KortekConfig) -> Result<Arc<dyn EndpointStore>, RuntimeError> {
    match &cfg.registry.database {
        Some(path) => {
            tracing::debug!(database = %path.display(), "opening sqlite endpoint store");
            Ok(Arc::new(crate::store::SqliteStore::open(path)?))
        }
        None => Ok(Arc::new(MemoryStore::new())),
    }
}

#[cfg(not(feature = "sqlite"))]
fn open_store(cfg: &KortekConfig) -> Result<Arc<dyn EndpointStore>, RuntimeError> {
    if cfg.registry.database.is_some() {
        tracing::warn!("sqlite support is disabled; using an in-memory endpoint store");
    }
    Ok(Arc::new(MemoryStore::new()))
}

fn default_endpoint(cfg: &DefaultEndpointConfig) -> Result<Option<DefaultEndpoint>, RuntimeError> {
    if !cfg.enable {
        return Ok(None);
    }

    let url = normalize_base_url(&cfg.url).map_err(|e| RuntimeError::DefaultEndpoint(e.to_string()))?;
    Ok(Some(DefaultEndpoint {
        name: cfg.name.clone(),
        url,
        source_domain: cfg.source_domain.clone(),
    }))
}

impl Engine {
    /// Wires the engine over caller-supplied collaborators.
    pub fn assemble(
        cfg: &KortekConfig,
        store: Arc<dyn EndpointStore>,
        cache: Arc<dyn SharedCache>,
        transport: Arc<dyn UpstreamTransport>,
    ) -> Result<Engine, RuntimeError> {
        let registry = Arc::new(EndpointRegistry::new(
            store.clone(),
            cache.clone(),
            default_endpoint(&cfg.default_endpoint)?,
            cfg.registry.snapshot_ttl(),
        ));

        let seeded = registry.seed(&cfg.endpoints)?;
        if seeded > 0 {
            tracing::info!(seeded, "endpoint registry seeded from configuration");
        }

        let recorder = MonitorRecorder::new(store).with_snippet_limit(cfg.monitor.snippet_limit);
        let dispatcher = Dispatcher::new(
            transport.clone(),
            ResponseValidator::new(cfg.engine.confidence_threshold),
            cfg.engine.read_timeout(),
            cfg.engine.bypass_cache_param.clone(),
        );
        let prober = HealthProber::new(transport, cfg.health.path.clone(), cfg.health.timeout());

        Ok(Engine {
            orchestrator: FallbackOrchestrator::new(
                registry.clone(),
                cache,
                dispatcher.clone(),
                recorder.clone(),
            ),
            sweep: HealthSweep::new(prober.clone(), registry.clone(), cfg.health.failure_threshold),
            status: StatusChecker::new(
                registry.clone(),
                dispatcher,
                recorder.clone(),
                cfg.monitor.paths.clone(),
                cfg.monitor.search_query.clone(),
            ),
            registry,
            recorder,
            prober,
        })
    }
}
