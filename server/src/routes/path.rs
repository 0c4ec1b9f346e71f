//! `POST /path`: the itinerary query endpoint.
//!
//! Enumeration and post-processing are synchronous CPU-bound work, so the
//! handler runs them on `spawn_blocking` and races that against a
//! wall-clock timeout, cancelling the blocking side via
//! [`itinerary_engine::CancellationToken`] if the clock wins.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use warp::Filter;

use itinerary_engine::enumerator::{PathKind, TransferDetail};
use itinerary_engine::facade::PathQuery;
use itinerary_engine::{CancellationToken, PostprocessSummary, QueryResult, TransferStepOptions};

use crate::error::ApiError;
use crate::routes::with_state;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct PathRequest {
    start_station: String,
    end_station: String,
    #[serde(default)]
    max_transfers: Option<u8>,
    #[serde(default)]
    window_minutes: Option<u32>,
    #[serde(default)]
    allow_same_station_consecutive_transfers: bool,
}

#[derive(Serialize)]
struct PathResponse {
    start_station: String,
    end_station: String,
    paths: Vec<RankedPathDto>,
    summary: SummaryDto,
    metadata: MetadataDto,
}

#[derive(Serialize)]
struct SummaryDto {
    total_paths: usize,
    fastest_minutes: u32,
    window_minutes: u32,
    filtered_paths: usize,
    merged_paths: usize,
}

impl From<PostprocessSummary> for SummaryDto {
    fn from(summary: PostprocessSummary) -> SummaryDto {
        SummaryDto {
            total_paths: summary.total_paths,
            fastest_minutes: summary.fastest_minutes,
            window_minutes: summary.window_minutes,
            filtered_paths: summary.filtered_paths,
            merged_paths: summary.merged_paths,
        }
    }
}

#[derive(Serialize)]
struct MetadataDto {
    max_transfers: u8,
    generated_at: String,
}

#[derive(Serialize)]
struct RankedPathDto {
    id: u64,
    #[serde(rename = "type")]
    kind: &'static str,
    train_sequence: Vec<String>,
    departure_time: String,
    arrival_time: String,
    total_time: String,
    total_minutes: u32,
    is_fast: bool,
    transfer_count: u8,
    transfer_details: Vec<TransferDetailDto>,
    transfer_options: Vec<TransferStepOptionsDto>,
}

#[derive(Serialize)]
struct TransferDetailDto {
    station: String,
    arrival_time: String,
    departure_time: String,
    wait_minutes: u16,
}

#[derive(Serialize)]
struct TransferStepOptionsDto {
    step: u8,
    options: Vec<TransferDetailDto>,
}

impl From<itinerary_engine::RankedPath> for RankedPathDto {
    fn from(path: itinerary_engine::RankedPath) -> RankedPathDto {
        RankedPathDto {
            id: path.id,
            kind: match path.kind {
                PathKind::Direct => "Direct",
                PathKind::Transfer => "Transfer",
            },
            train_sequence: path.train_sequence.iter().map(|t| t.to_string()).collect(),
            departure_time: itinerary_engine::time::format(path.departure_time),
            arrival_time: itinerary_engine::time::format(path.arrival_time),
            total_time: itinerary_engine::time::format_duration(
                itinerary_engine::time::MinuteDelta::minutes(path.total_minutes as u16),
            ),
            total_minutes: path.total_minutes,
            is_fast: path.is_fast,
            transfer_count: path.transfer_count,
            transfer_details: path.transfer_details.into_iter().map(TransferDetailDto::from).collect(),
            transfer_options: path
                .transfer_options
                .into_iter()
                .map(TransferStepOptionsDto::from)
                .collect(),
        }
    }
}

impl From<TransferDetail> for TransferDetailDto {
    fn from(detail: TransferDetail) -> TransferDetailDto {
        TransferDetailDto {
            station: detail.station.to_string(),
            arrival_time: itinerary_engine::time::format(detail.arrival_time),
            departure_time: itinerary_engine::time::format(detail.departure_time),
            wait_minutes: detail.wait_minutes,
        }
    }
}

impl From<TransferStepOptions> for TransferStepOptionsDto {
    fn from(step_options: TransferStepOptions) -> TransferStepOptionsDto {
        TransferStepOptionsDto {
            step: step_options.step,
            options: step_options
                .options
                .into_iter()
                .map(TransferDetailDto::from)
                .collect(),
        }
    }
}

fn build_response(query: &PathQuery, result: QueryResult) -> PathResponse {
    PathResponse {
        start_station: query.start_station().to_owned(),
        end_station: query.end_station().to_owned(),
        paths: result.paths.into_iter().map(RankedPathDto::from).collect(),
        summary: SummaryDto::from(result.summary),
        metadata: MetadataDto {
            max_transfers: query.max_transfers(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        },
    }
}

async fn handler(
    request: PathRequest,
    state: Arc<AppState>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let snapshot = state.current();
    let query = PathQuery::new(
        snapshot.station_directory(),
        &request.start_station,
        &request.end_station,
        request.max_transfers,
        request.window_minutes,
        request.allow_same_station_consecutive_transfers,
    )
    .map_err(ApiError::from)
    .map_err(warp::reject::custom)?;

    let cancellation = CancellationToken::new();
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    let snapshot_for_task = snapshot.clone();
    let cancellation_for_task = cancellation.clone();
    let query_for_task = query.clone();
    let task = tokio::task::spawn_blocking(move || {
        snapshot_for_task
            .facade()
            .run(&query_for_task, &cancellation_for_task)
    });

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(Ok(result))) => Ok(warp::reply::json(&build_response(&query, result))),
        Ok(Ok(Err(err))) => {
            tracing::error!(?err, "path enumeration failed");
            Err(warp::reject::custom(ApiError::Internal(err.to_string())))
        }
        Ok(Err(join_error)) => {
            tracing::error!(?join_error, "path enumeration task panicked");
            Err(warp::reject::custom(ApiError::Internal(
                "enumeration task failed".to_owned(),
            )))
        }
        Err(_elapsed) => {
            cancellation.cancel();
            Err(warp::reject::custom(ApiError::Timeout))
        }
    }
}

pub fn route(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("path")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(64 * 1024))
        .and(warp::body::json())
        .and(with_state(state))
        .and_then(handler)
}
