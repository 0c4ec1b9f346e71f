//! Route assembly. One module per endpoint.

mod admin;
mod health;
mod path;
mod stations;

use std::sync::Arc;

use warp::Filter;

use crate::state::AppState;

/// An infallible filter that clones a shared `Arc` into each request's
/// filter chain.
pub fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || state.clone())
}

pub fn all(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    health::route(state.clone())
        .or(stations::route(state.clone()))
        .or(path::route(state.clone()))
        .or(admin::reload_route(state))
}
