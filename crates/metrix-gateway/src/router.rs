//! Axum router wiring.
//!
//! Metric API under `/v1`, operational endpoints at the root.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{api, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    let v1 = Router::new()
        .route(
            "/v1/metrics",
            post(api::metrics::create_metrics)
                .put(api::metrics::append_metrics)
                .delete(api::metrics::reset),
        )
        .route("/v1/metrics/:id", get(api::metrics::get_metric))
        .route("/v1/metrics/:id/stats", get(api::metrics::raw_stats))
        .route("/v1/summaries", get(api::metrics::summaries))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api::track::track_requests,
        ));

    Router::new()
        .merge(v1)
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
