//! `POST /admin/reload`: re-reads the schedule file and atomically
//! publishes a new snapshot. An operator escape hatch for picking up a
//! changed schedule file without a process restart.

use std::sync::Arc;

use warp::Filter;

use crate::error::ApiError;
use crate::routes::with_state;
use crate::state::AppState;

async fn handler(state: Arc<AppState>) -> Result<impl warp::Reply, warp::Rejection> {
    state.reload().map_err(|err| {
        tracing::error!(?err, "schedule reload failed");
        warp::reject::custom(ApiError::Internal(err.to_string()))
    })?;
    Ok(warp::reply::json(&serde_json::json!({ "reloaded": true })))
}

pub fn reload_route(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path!("admin" / "reload")
        .and(warp::post())
        .and(with_state(state))
        .and_then(handler)
}
