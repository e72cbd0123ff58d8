//! Running per-metric aggregates.
//!
//! The engine never rescans a metric's history: each mutation contributes only
//! the values it has not seen yet (normally just the newest one). Mean is an
//! incremental running mean, min/max come from a single comparison, and the
//! median from the two-heap structure in `median`.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use serde::Serialize;

use crate::error::{lock, MetrixError, Result};
use crate::model::{mean_step, Metric, MetricId};
use crate::store::MutationObserver;

use super::median::{MedianHeap, MedianRule};

/// Lifetime summary of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub id: MetricId,
    pub count: u64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug)]
struct RunningSummary {
    count: u64,
    mean: f64,
    min: f64,
    max: f64,
    order: MedianHeap,
}

impl Default for RunningSummary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            order: MedianHeap::new(),
        }
    }
}

impl RunningSummary {
    fn observe(&mut self, v: f64) {
        self.count += 1;
        self.mean = mean_step(self.mean, v, self.count);
        if v < self.min {
            self.min = v;
        }
        if v > self.max {
            self.max = v;
        }
        self.order.push(v);
    }

    fn summary(&self, id: MetricId, rule: MedianRule) -> Result<MetricSummary> {
        let median = self
            .order
            .median(rule)
            .ok_or_else(|| MetrixError::Internal(format!("empty summary for {id}")))?;
        Ok(MetricSummary {
            id,
            count: self.count,
            mean: self.mean,
            median,
            min: self.min,
            max: self.max,
        })
    }
}

pub struct StatisticsEngine {
    summaries: DashMap<MetricId, Arc<Mutex<RunningSummary>>>,
    rule: MedianRule,
}

impl StatisticsEngine {
    pub fn new(rule: MedianRule) -> Self {
        Self {
            summaries: DashMap::new(),
            rule,
        }
    }

    pub fn median_rule(&self) -> MedianRule {
        self.rule
    }

    fn slot(&self, id: &MetricId) -> Option<Arc<Mutex<RunningSummary>>> {
        self.summaries.get(id).map(|r| Arc::clone(r.value()))
    }

    /// Fold the unseen tail of `metric.values` into its summary, creating the
    /// summary on first sight. A stale snapshot (shorter than what was already
    /// folded) is a no-op.
    pub fn observe(&self, metric: &Metric) -> Result<()> {
        if metric.values.is_empty() {
            return Ok(());
        }

        let slot = match self.slot(&metric.id) {
            Some(s) => s,
            None => Arc::clone(
                self.summaries
                    .entry(metric.id)
                    .or_insert_with(Default::default)
                    .value(),
            ),
        };
        let mut running = lock(&slot)?;

        let seen = usize::try_from(running.count).unwrap_or(usize::MAX);
        for &v in metric.values.iter().skip(seen) {
            running.observe(v);
        }
        Ok(())
    }

    pub fn summary(&self, id: &MetricId) -> Result<MetricSummary> {
        let slot = self
            .slot(id)
            .ok_or_else(|| MetrixError::NotFound(id.to_string()))?;
        let running = lock(&slot)?;
        running.summary(*id, self.rule)
    }

    /// One summary per id, in input order. Fails on the first id without a
    /// summary; nothing is modified either way.
    pub fn summarize(&self, ids: &[MetricId]) -> Result<Vec<MetricSummary>> {
        ids.iter().map(|id| self.summary(id)).collect()
    }

    pub fn contains(&self, id: &MetricId) -> bool {
        self.summaries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    pub fn reset(&self) {
        self.summaries.clear();
        tracing::debug!("statistics engine reset");
    }
}

impl Default for StatisticsEngine {
    fn default() -> Self {
        Self::new(MedianRule::default())
    }
}

impl MutationObserver for StatisticsEngine {
    fn on_mutation(&self, metric: &Metric) -> Result<()> {
        self.observe(metric)
    }

    fn on_reset(&self) {
        self.reset();
    }
}
