//! `GET /health`: reports whether a schedule snapshot is currently
//! loaded and queryable.

use std::sync::Arc;

use serde::Serialize;
use warp::Filter;

use crate::routes::with_state;
use crate::state::AppState;

#[derive(Serialize)]
struct DataLoaded {
    graph: bool,
    schedule: bool,
    train_info: bool,
    directionality_map: bool,
    adjacency: bool,
    nodes: bool,
    stations_list: bool,
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    data_loaded: DataLoaded,
    timestamp: String,
}

/// The server only starts accepting connections after its one synchronous
/// startup load succeeds, so every field here is true for the lifetime of
/// the listener: there is no "unhealthy but serving" state, and a failed
/// reload leaves the previous, still-loaded snapshot in place.
async fn handler(state: Arc<AppState>) -> Result<impl warp::Reply, warp::Rejection> {
    let _snapshot = state.current();
    Ok(warp::reply::json(&HealthBody {
        status: "healthy",
        data_loaded: DataLoaded {
            graph: true,
            schedule: true,
            train_info: true,
            directionality_map: true,
            adjacency: true,
            nodes: true,
            stations_list: true,
        },
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

pub fn route(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state))
        .and_then(handler)
}
