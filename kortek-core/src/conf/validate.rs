use crate::conf::ConfigError;
use crate::conf::types::KortekConfig;
use crate::endpoint::normalize_base_url;
use crate::source_domain::is_valid_domain;
use std::collections::HashSet;

/// Checks the whole config and reports every problem at once.
pub fn validate_config(cfg: &KortekConfig) -> Result<(), ConfigError> {
    let mut issues = Vec::new();

    //-------------------------------------------------------------------------
    // engine
    //-------------------------------------------------------------------------
    if cfg.engine.connect_timeout_ms == 0 {
        issues.push("engine.connect_timeout_ms must be greater than zero".to_string());
    }
    if cfg.engine.read_timeout_ms == 0 {
        issues.push("engine.read_timeout_ms must be greater than zero".to_string());
    }
    if !(0.0..=1.0).contains(&cfg.engine.confidence_threshold) {
        issues.push(format!(
            "engine.confidence_threshold must be between 0 and 1, got {}",
            cfg.engine.confidence_threshold
        ));
    }
    if cfg.engine.bypass_cache_param.trim().is_empty() {
        issues.push("engine.bypass_cache_param must not be empty".to_string());
    }

    //-------------------------------------------------------------------------
    // health
    //-------------------------------------------------------------------------
    if cfg.health.path.trim_matches('/').is_empty() {
        issues.push("health.path must not be empty".to_string());
    }
    if cfg.health.timeout_ms == 0 {
        issues.push("health.timeout_ms must be greater than zero".to_string());
    }
    if cfg.health.failure_threshold == 0 {
        issues.push("health.failure_threshold must be at least 1".to_string());
    }

    //-------------------------------------------------------------------------
    // default endpoint
    //-------------------------------------------------------------------------
    if cfg.default_endpoint.enable {
        if let Err(e) = normalize_base_url(&cfg.default_endpoint.url) {
            issues.push(format!("default_endpoint.url: {e}"));
        }
        if !cfg.default_endpoint.source_domain.is_empty()
            && !is_valid_domain(&cfg.default_endpoint.source_domain)
        {
            issues.push(format!(
                "default_endpoint.source_domain '{}' is not a valid domain",
                cfg.default_endpoint.source_domain
            ));
        }
    }

    //-------------------------------------------------------------------------
    // monitor
    //-------------------------------------------------------------------------
    if cfg.monitor.snippet_limit == 0 {
        issues.push("monitor.snippet_limit must be greater than zero".to_string());
    }
    if cfg.monitor.paths.iter().any(|p| p.trim_matches('/').is_empty()) {
        issues.push("monitor.paths must not contain empty paths".to_string());
    }

    //-------------------------------------------------------------------------
    // endpoint seeds
    //-------------------------------------------------------------------------
    let mut names = HashSet::new();
    for (i, seed) in cfg.endpoints.iter().enumerate() {
        if seed.name.trim().is_empty() {
            issues.push(format!("endpoints[{i}].name must not be empty"));
        } else if !names.insert(seed.name.as_str()) {
            issues.push(format!("endpoints[{i}]: duplicate endpoint name '{}'", seed.name));
        }
        if let Err(e) = normalize_base_url(&seed.url) {
            issues.push(format!("endpoints[{i}].url: {e}"));
        }
        if !seed.source_domain.is_empty() && !is_valid_domain(&seed.source_domain) {
            issues.push(format!(
                "endpoints[{i}].source_domain '{}' is not a valid domain",
                seed.source_domain
            ));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation { issues })
    }
}
