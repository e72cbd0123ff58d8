//! Authoritative metric store: `id -> ordered value sequence`.
//!
//! The outer `DashMap` only hands out `Arc` handles; every value sequence sits
//! behind its own mutex. The shard guard is dropped before the per-metric lock
//! is taken, so appends to different metrics never wait on each other while
//! appends to the same metric are serialized.
//!
//! Mutations also hold a shared read guard on a store-wide gate from lookup
//! to notification; `reset` takes it exclusively, so a wipe never interleaves
//! with an in-flight create or append.

use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::config::NamePolicy;
use crate::error::{lock, MetrixError, Result};
use crate::model::{check_value, AppendMetric, BatchOutcome, CreateMetric, Metric, MetricId};

/// Receives every create/append with the metric's full current sequence.
///
/// Called while the store still holds that metric's lock, so an observer sees
/// mutations of a single metric in the order they were applied. An error
/// rolls the mutation back and is returned to the caller.
pub trait MutationObserver: Send + Sync {
    fn on_mutation(&self, metric: &Metric) -> Result<()>;

    /// Called after a store reset, still under the exclusive gate.
    fn on_reset(&self) {}
}

struct MetricEntry {
    name: String,
    values: Vec<f64>,
}

impl MetricEntry {
    fn snapshot(&self, id: MetricId) -> Metric {
        Metric {
            id,
            name: self.name.clone(),
            values: self.values.clone(),
        }
    }
}

pub struct MetricStore {
    metrics: DashMap<MetricId, Arc<Mutex<MetricEntry>>>,
    /// `name -> id`, populated only under `NamePolicy::Unique`.
    names: DashMap<String, MetricId>,
    policy: NamePolicy,
    observers: Vec<Arc<dyn MutationObserver>>,
    gate: RwLock<()>,
}

impl MetricStore {
    pub fn new(policy: NamePolicy) -> Self {
        Self {
            metrics: DashMap::new(),
            names: DashMap::new(),
            policy,
            observers: Vec::new(),
            gate: RwLock::new(()),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn MutationObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn name_policy(&self) -> NamePolicy {
        self.policy
    }

    // The gate guards no data, so a poisoned gate is still usable.
    fn mutating(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, metric: &Metric) -> Result<()> {
        for o in &self.observers {
            o.on_mutation(metric)?;
        }
        Ok(())
    }

    fn slot(&self, id: &MetricId) -> Result<Arc<Mutex<MetricEntry>>> {
        self.metrics
            .get(id)
            .map(|r| Arc::clone(r.value()))
            .ok_or_else(|| MetrixError::NotFound(id.to_string()))
    }

    /// Register a new metric with its first observation.
    pub fn create(&self, name: &str, value: f64) -> Result<Metric> {
        let value = check_value(value)?;
        let id = MetricId::new();
        let _gate = self.mutating();

        if self.policy == NamePolicy::Unique {
            match self.names.entry(name.to_string()) {
                Entry::Occupied(_) => return Err(MetrixError::AlreadyExists(name.to_string())),
                Entry::Vacant(v) => {
                    v.insert(id);
                }
            }
        }

        let entry = MetricEntry {
            name: name.to_string(),
            values: vec![value],
        };
        let metric = entry.snapshot(id);

        // The id is not published yet, so nobody can race this notification.
        if let Err(e) = self.notify(&metric) {
            if self.policy == NamePolicy::Unique {
                self.names.remove(name);
            }
            return Err(e);
        }

        self.metrics.insert(id, Arc::new(Mutex::new(entry)));
        tracing::debug!(%id, name, "metric created");
        Ok(metric)
    }

    /// Best-effort: each element is created independently.
    pub fn create_batch(&self, reqs: &[CreateMetric]) -> BatchOutcome {
        let mut out = BatchOutcome::with_capacity(reqs.len());
        for (i, req) in reqs.iter().enumerate() {
            let res = req.value.parse().and_then(|v| self.create(&req.name, v));
            out.record(i, res);
        }
        out
    }

    /// Look up by textual id (`InvalidKey` if malformed).
    pub fn get(&self, id: &str) -> Result<Metric> {
        self.find(&id.parse()?)
    }

    pub fn find(&self, id: &MetricId) -> Result<Metric> {
        let slot = self.slot(id)?;
        let entry = lock(&slot)?;
        Ok(entry.snapshot(*id))
    }

    pub fn contains(&self, id: &MetricId) -> bool {
        self.metrics.contains_key(id)
    }

    /// Append to a metric addressed by textual id.
    pub fn append(&self, id: &str, value: f64) -> Result<Metric> {
        self.append_to(&id.parse()?, value)
    }

    pub fn append_to(&self, id: &MetricId, value: f64) -> Result<Metric> {
        let value = check_value(value)?;
        let _gate = self.mutating();
        let slot = self.slot(id)?;
        let mut entry = lock(&slot)?;

        entry.values.push(value);
        let metric = entry.snapshot(*id);
        if let Err(e) = self.notify(&metric) {
            entry.values.pop();
            return Err(e);
        }

        tracing::trace!(%id, len = metric.values.len(), "metric appended");
        Ok(metric)
    }

    /// Best-effort: unknown or malformed ids are rejected per element.
    pub fn append_batch(&self, reqs: &[AppendMetric]) -> BatchOutcome {
        let mut out = BatchOutcome::with_capacity(reqs.len());
        for (i, req) in reqs.iter().enumerate() {
            let res = req.id.parse::<MetricId>().and_then(|id| {
                let v = req.value.parse()?;
                self.append_to(&id, v)
            });
            out.record(i, res);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Administrative wipe of every metric. Waits for in-flight mutations;
    /// observers are reset before any new mutation can start.
    pub fn reset(&self) {
        let _gate = self.gate.write().unwrap_or_else(PoisonError::into_inner);
        self.metrics.clear();
        self.names.clear();
        for o in &self.observers {
            o.on_reset();
        }
        tracing::debug!("metric store reset");
    }
}

impl Default for MetricStore {
    fn default() -> Self {
        Self::new(NamePolicy::default())
    }
}
