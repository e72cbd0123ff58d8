//! Per-route request accounting (count by status, latency histogram).

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;

/// Installed with `route_layer` so `MatchedPath` is already resolved.
pub async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let method = req.method().as_str().to_owned();

    let started = Instant::now();
    let res = next.run(req).await;
    let elapsed = started.elapsed();

    let status = res.status();
    let metrics = state.metrics();
    metrics.http_requests.inc(&[
        ("method", method.as_str()),
        ("route", route.as_str()),
        ("status", status.as_str()),
    ]);
    metrics
        .http_duration
        .observe(&[("method", method.as_str()), ("route", route.as_str())], elapsed);

    tracing::debug!(%method, %route, status = status.as_u16(), ?elapsed, "request served");
    res
}
