use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use metrix_core::{AppendMetric, BatchOutcome, CreateMetric, Metric, MetricSummary, RawStats};

use crate::app_state::AppState;
use crate::error::ApiError;

type ApiResult<T> = std::result::Result<T, ApiError>;

fn check_batch_len(state: &AppState, got: usize) -> ApiResult<()> {
    let limit = state.cfg().gateway.max_batch_items;
    if got > limit {
        return Err(ApiError::BatchTooLarge { got, limit });
    }
    Ok(())
}

fn record_rejections(state: &AppState, op: &str, out: &BatchOutcome) {
    for r in &out.rejected {
        state
            .metrics()
            .batch_rejections
            .inc(&[("op", op), ("code", r.code)]);
    }
    if !out.is_complete() {
        tracing::warn!(
            op,
            applied = out.applied.len(),
            rejected = out.rejected.len(),
            "batch partially applied"
        );
    }
}

/// `POST /v1/metrics`: register metrics. 201 if at least one was created.
pub async fn create_metrics(
    State(state): State<AppState>,
    Json(reqs): Json<Vec<CreateMetric>>,
) -> ApiResult<(StatusCode, Json<BatchOutcome>)> {
    check_batch_len(&state, reqs.len())?;

    let out = state.registry().create_batch(&reqs);
    record_rejections(&state, "create", &out);

    let status = if out.applied.is_empty() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(out)))
}

/// `PUT /v1/metrics`: append one value per element.
pub async fn append_metrics(
    State(state): State<AppState>,
    Json(reqs): Json<Vec<AppendMetric>>,
) -> ApiResult<Json<BatchOutcome>> {
    check_batch_len(&state, reqs.len())?;

    let out = state.registry().append_batch(&reqs);
    record_rejections(&state, "append", &out);
    Ok(Json(out))
}

/// `GET /v1/metrics/:id`
pub async fn get_metric(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Metric>> {
    Ok(Json(state.registry().get(&id)?))
}

/// `GET /v1/metrics/:id/stats`: recomputed from the raw values.
pub async fn raw_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RawStats>> {
    Ok(Json(state.registry().raw_stats(&id)?))
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Comma-separated metric ids.
    pub ids: String,
}

/// `GET /v1/summaries?ids=a,b`
pub async fn summaries(
    State(state): State<AppState>,
    Query(q): Query<SummaryQuery>,
) -> ApiResult<Json<Vec<MetricSummary>>> {
    let ids: Vec<&str> = q
        .ids
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if ids.is_empty() {
        return Err(ApiError::BadRequest("ids must not be empty".into()));
    }
    check_batch_len(&state, ids.len())?;

    Ok(Json(state.registry().summarize(&ids)?))
}

/// `DELETE /v1/metrics`: administrative reset, gated by `gateway.allow_reset`.
pub async fn reset(State(state): State<AppState>) -> ApiResult<StatusCode> {
    if !state.cfg().gateway.allow_reset {
        return Err(ApiError::ResetDisabled);
    }
    state.registry().reset();
    Ok(StatusCode::NO_CONTENT)
}
