//! Shared application state for the metrix gateway.

use std::sync::Arc;

use metrix_core::error::Result;
use metrix_core::MetricRegistry;

use crate::config::MetrixConfig;
use crate::obs::metrics::GatewayMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    registry: Arc<MetricRegistry>,
    metrics: Arc<GatewayMetrics>,
}

struct AppStateInner {
    cfg: MetrixConfig,
}

impl AppState {
    /// Build application state from a validated config.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: MetrixConfig) -> Result<Self> {
        cfg.validate()?;

        let registry = Arc::new(MetricRegistry::new(cfg.registry));
        tracing::info!(
            name_policy = ?cfg.registry.name_policy,
            median_rule = ?cfg.registry.median_rule,
            max_batch_items = cfg.gateway.max_batch_items,
            "metric registry ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg }),
            registry,
            metrics: Arc::new(GatewayMetrics::default()),
        })
    }

    pub fn cfg(&self) -> &MetrixConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.metrics.set_draining();
    }

    /// Gauges rendered next to the request metrics.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![
            ("metrix_registry_metrics", self.registry.len() as u64),
            ("metrix_registry_summaries", self.registry.engine().len() as u64),
        ]
    }
}
