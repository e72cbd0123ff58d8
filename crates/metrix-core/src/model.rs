//! Metric data model and request/response shapes shared with transports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{MetrixError, Result};

/// Opaque, globally unique metric identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricId(Uuid);

impl MetricId {
    /// Fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MetricId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for MetricId {
    type Err = MetrixError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| MetrixError::InvalidKey(s.to_string()))
    }
}

/// Reject NaN and infinities; everything else is a valid observation.
pub fn check_value(v: f64) -> Result<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(MetrixError::InvalidValue(v.to_string()))
    }
}

/// Fold the `n`-th observation into a running mean.
///
/// Both terms are scaled by `1/n` before they are combined, so the result stays
/// finite for any finite inputs, including values near `f64::MAX`.
pub(crate) fn mean_step(mean: f64, v: f64, n: u64) -> f64 {
    let n = n as f64;
    mean - mean / n + v / n
}

/// A named, append-only sequence of observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub id: MetricId,
    pub name: String,
    pub values: Vec<f64>,
}

impl Metric {
    /// Full recompute over the raw sequence.
    pub fn raw_stats(&self) -> RawStats {
        let mut stats = RawStats {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            average: 0.0,
        };
        for &v in &self.values {
            stats.count += 1;
            stats.sum += v;
            stats.min = stats.min.min(v);
            stats.max = stats.max.max(v);
            stats.average = mean_step(stats.average, v, stats.count);
        }
        stats
    }
}

/// Count/sum/min/max/average computed directly from the raw values.
///
/// `sum` may overflow to infinity for huge observations; `average` does not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawStats {
    pub count: u64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

/// Observation as sent by a client: a JSON number or numeric text.
///
/// Anything else (`null`, booleans, objects, a missing field) still
/// deserializes, as `Other`, so one bad element cannot fail a whole batch
/// body. `parse` rejects it as `InvalidValue`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ObservationInput {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Default for ObservationInput {
    fn default() -> Self {
        ObservationInput::Other(serde_json::Value::Null)
    }
}

impl ObservationInput {
    /// Parse into a finite `f64`.
    pub fn parse(&self) -> Result<f64> {
        match self {
            ObservationInput::Number(v) => check_value(*v),
            ObservationInput::Text(s) => {
                let v: f64 = s
                    .trim()
                    .parse()
                    .map_err(|_| MetrixError::InvalidValue(s.clone()))?;
                check_value(v)
            }
            ObservationInput::Other(raw) => Err(MetrixError::InvalidValue(raw.to_string())),
        }
    }
}

impl From<f64> for ObservationInput {
    fn from(v: f64) -> Self {
        ObservationInput::Number(v)
    }
}

impl From<&str> for ObservationInput {
    fn from(s: &str) -> Self {
        ObservationInput::Text(s.to_string())
    }
}

/// One element of a create batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMetric {
    pub name: String,
    #[serde(default)]
    pub value: ObservationInput,
}

impl CreateMetric {
    pub fn new(name: impl Into<String>, value: impl Into<ObservationInput>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// One element of an append batch. The id stays textual so a malformed id
/// is rejected per element instead of failing the whole request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppendMetric {
    pub id: String,
    #[serde(default)]
    pub value: ObservationInput,
}

impl AppendMetric {
    pub fn new(id: impl ToString, value: impl Into<ObservationInput>) -> Self {
        Self { id: id.to_string(), value: value.into() }
    }
}

/// A batch element that was not applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRejection {
    /// Position in the request batch.
    pub index: usize,
    /// Stable error code (`ClientCode::as_str`).
    pub code: &'static str,
    pub message: String,
}

/// Result of a best-effort batch: applied metrics in request order plus the
/// elements that failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub applied: Vec<Metric>,
    pub rejected: Vec<BatchRejection>,
}

impl BatchOutcome {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self { applied: Vec::with_capacity(n), rejected: Vec::new() }
    }

    pub(crate) fn record(&mut self, index: usize, res: Result<Metric>) {
        match res {
            Ok(m) => self.applied.push(m),
            Err(e) => self.rejected.push(BatchRejection {
                index,
                code: e.client_code().as_str(),
                message: e.to_string(),
            }),
        }
    }

    /// True when every element was applied.
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}
