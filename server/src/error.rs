//! Maps engine errors onto HTTP status codes and a uniform JSON error
//! envelope. Handlers return `warp::reject::custom(some_error)`; a
//! `recover` filter at the top of the route tree renders every rejection
//! as a `{"error": ..}` body instead of warp's built-in plain text.

use itinerary_engine::facade::QueryError;
use serde::Serialize;
use warp::http::StatusCode;
use warp::{reject, Rejection, Reply};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    UnknownStation(String),
    DataNotLoaded,
    Timeout,
    Internal(String),
}

impl reject::Reject for ApiError {}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> ApiError {
        match err {
            QueryError::UnknownStation(name) => ApiError::UnknownStation(name),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    detail: Option<String>,
}

fn status_and_label(err: &ApiError) -> (StatusCode, &'static str, Option<String>) {
    match err {
        ApiError::BadRequest(detail) => {
            (StatusCode::BAD_REQUEST, "bad_request", Some(detail.clone()))
        }
        ApiError::UnknownStation(name) => (
            StatusCode::NOT_FOUND,
            "unknown_station",
            Some(name.clone()),
        ),
        ApiError::DataNotLoaded => (StatusCode::SERVICE_UNAVAILABLE, "data_not_loaded", None),
        ApiError::Timeout => (StatusCode::REQUEST_TIMEOUT, "timeout", None),
        ApiError::Internal(detail) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal", Some(detail.clone()))
        }
    }
}

/// The terminal rejection handler, installed with `.recover(recover)` at
/// the top of the filter tree in `main`. Anything not recognized here
/// (warp's own `NotFound`, method-not-allowed, body decode failures) falls
/// through to a generic 500 rather than leaking warp's default plain-text
/// body, keeping the envelope uniform across every response.
pub async fn recover(rejection: Rejection) -> Result<impl Reply, std::convert::Infallible> {
    let (status, error, detail) = if let Some(err) = rejection.find::<ApiError>() {
        status_and_label(err)
    } else if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "not_found", None)
    } else if rejection.find::<reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed", None)
    } else if rejection
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        (StatusCode::BAD_REQUEST, "bad_request", Some("malformed request body".to_owned()))
    } else {
        tracing::error!(?rejection, "unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal", None)
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorBody { error, detail }),
        status,
    ))
}
