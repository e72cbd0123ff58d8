//! `MetricRegistry`: the store wired to the statistics engine.
//!
//! This is the surface transports call. Ids arrive as text and are parsed
//! here, so a malformed id is always `InvalidKey` and never `NotFound`.

use std::sync::Arc;

use crate::config::RegistryConfig;
use crate::error::Result;
use crate::model::{AppendMetric, BatchOutcome, CreateMetric, Metric, MetricId, RawStats};
use crate::stats::{MetricSummary, StatisticsEngine};
use crate::store::MetricStore;

pub struct MetricRegistry {
    cfg: RegistryConfig,
    store: MetricStore,
    engine: Arc<StatisticsEngine>,
}

impl MetricRegistry {
    pub fn new(cfg: RegistryConfig) -> Self {
        let engine = Arc::new(StatisticsEngine::new(cfg.median_rule));
        let store = MetricStore::new(cfg.name_policy).with_observer(engine.clone());
        Self { cfg, store, engine }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.cfg
    }

    pub fn store(&self) -> &MetricStore {
        &self.store
    }

    pub fn engine(&self) -> &StatisticsEngine {
        &self.engine
    }

    pub fn create(&self, name: &str, value: f64) -> Result<Metric> {
        self.store.create(name, value)
    }

    pub fn create_batch(&self, reqs: &[CreateMetric]) -> BatchOutcome {
        self.store.create_batch(reqs)
    }

    pub fn append(&self, id: &str, value: f64) -> Result<Metric> {
        self.store.append(id, value)
    }

    pub fn append_batch(&self, reqs: &[AppendMetric]) -> BatchOutcome {
        self.store.append_batch(reqs)
    }

    pub fn get(&self, id: &str) -> Result<Metric> {
        self.store.get(id)
    }

    /// Full recompute from the raw sequence, independent of the engine.
    pub fn raw_stats(&self, id: &str) -> Result<RawStats> {
        Ok(self.store.get(id)?.raw_stats())
    }

    /// Every id is parsed before any summary is read.
    pub fn summarize<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<MetricSummary>> {
        let ids = ids
            .iter()
            .map(|s| s.as_ref().parse::<MetricId>())
            .collect::<Result<Vec<_>>>()?;
        self.engine.summarize(&ids)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Administrative wipe of metrics and summaries. The store resets the
    /// engine under its exclusive gate.
    pub fn reset(&self) {
        self.store.reset();
        tracing::info!("metric registry reset");
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
