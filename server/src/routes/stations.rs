//! `GET /stations`: lists every station name in the current snapshot.

use std::sync::Arc;

use serde::Serialize;
use warp::Filter;

use crate::routes::with_state;
use crate::state::AppState;

#[derive(Serialize)]
struct StationsBody {
    stations: Vec<String>,
    count: usize,
    timestamp: String,
}

async fn handler(state: Arc<AppState>) -> Result<impl warp::Reply, warp::Rejection> {
    let snapshot = state.current();
    let stations: Vec<String> = snapshot
        .station_directory()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let count = stations.len();
    Ok(warp::reply::json(&StationsBody {
        stations,
        count,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

pub fn route(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("stations")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state))
        .and_then(handler)
}
