//! The query facade: validates a caller's request against the loaded
//! schedule and composes the enumerator and post-processor into a single
//! call.

use std::collections::{HashMap, HashSet};

use crate::adjacency::Adjacency;
use crate::cancellation::CancellationToken;
use crate::enumerator::{self, EnumerationStats, EnumeratorError};
use crate::graph::Node;
use crate::postprocess::{self, PostprocessSummary, RankedPath};
use crate::schedule::{StationName, TrainId};

pub const MAX_TRANSFERS_CEILING: u8 = enumerator::HARD_CAP;
pub const DEFAULT_MAX_TRANSFERS: u8 = 2;
pub const DEFAULT_WINDOW_MINUTES: u32 = 120;
pub const WINDOW_MINUTES_CEILING: u32 = 480;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("start and end station must differ")]
    SameStation,
    #[error("start_station and end_station must not be empty")]
    EmptyStation,
    #[error("unknown station {0:?}")]
    UnknownStation(String),
    #[error("max_transfers must be in 0..={MAX_TRANSFERS_CEILING}, got {0}")]
    MaxTransfersOutOfRange(u8),
    #[error("window_minutes must be in 0..={WINDOW_MINUTES_CEILING}, got {0}")]
    WindowMinutesOutOfRange(u32),
}

/// A validated request, ready to hand to [`QueryFacade::run`]. Construct
/// with [`PathQuery::new`]; there is no public way to build one that skips
/// validation.
#[derive(Debug, Clone)]
pub struct PathQuery {
    start_station: StationName,
    end_station: StationName,
    max_transfers: u8,
    window_minutes: u32,
    allow_same_station_consecutive_transfers: bool,
}

impl PathQuery {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        station_directory: &[StationName],
        start_station: &str,
        end_station: &str,
        max_transfers: Option<u8>,
        window_minutes: Option<u32>,
        allow_same_station_consecutive_transfers: bool,
    ) -> Result<PathQuery, QueryError> {
        if start_station.is_empty() || end_station.is_empty() {
            return Err(QueryError::EmptyStation);
        }
        if start_station == end_station {
            return Err(QueryError::SameStation);
        }
        let start_station = lookup(station_directory, start_station)?;
        let end_station = lookup(station_directory, end_station)?;

        let max_transfers = max_transfers.unwrap_or(DEFAULT_MAX_TRANSFERS);
        if max_transfers > MAX_TRANSFERS_CEILING {
            return Err(QueryError::MaxTransfersOutOfRange(max_transfers));
        }

        let window_minutes = window_minutes.unwrap_or(DEFAULT_WINDOW_MINUTES);
        if window_minutes > WINDOW_MINUTES_CEILING {
            return Err(QueryError::WindowMinutesOutOfRange(window_minutes));
        }

        Ok(PathQuery {
            start_station,
            end_station,
            max_transfers,
            window_minutes,
            allow_same_station_consecutive_transfers,
        })
    }

    pub fn start_station(&self) -> &str {
        &self.start_station
    }

    pub fn end_station(&self) -> &str {
        &self.end_station
    }

    pub fn max_transfers(&self) -> u8 {
        self.max_transfers
    }
}

fn lookup(station_directory: &[StationName], name: &str) -> Result<StationName, QueryError> {
    station_directory
        .iter()
        .find(|s| s.as_ref() == name)
        .cloned()
        .ok_or_else(|| QueryError::UnknownStation(name.to_owned()))
}

#[derive(Debug, thiserror::Error)]
pub enum FacadeError {
    #[error(transparent)]
    Enumerator(#[from] EnumeratorError),
}

#[derive(Debug)]
pub struct QueryResult {
    pub paths: Vec<RankedPath>,
    pub stats: EnumerationStats,
    pub summary: PostprocessSummary,
}

/// Borrows the pieces of a [`crate::snapshot::Snapshot`] needed to run a
/// query, so the facade doesn't have to depend on the snapshot module's
/// build/reload machinery.
pub struct QueryFacade<'a> {
    pub nodes: &'a [Node],
    pub adjacency: &'a Adjacency,
    pub fast_trains: &'a HashSet<TrainId>,
    pub direction_map: &'a HashMap<TrainId, Vec<i8>>,
}

impl<'a> QueryFacade<'a> {
    pub fn run(
        &self,
        query: &PathQuery,
        cancellation: &CancellationToken,
    ) -> Result<QueryResult, FacadeError> {
        let (paths, stats) = enumerator::find_paths(
            self.nodes,
            self.adjacency,
            self.fast_trains,
            self.direction_map,
            &query.start_station,
            &query.end_station,
            query.max_transfers,
            query.allow_same_station_consecutive_transfers,
            cancellation,
        )?;
        let output = postprocess::process(paths, query.window_minutes);
        Ok(QueryResult {
            paths: output.paths,
            stats,
            summary: output.summary,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;

    fn directory() -> Vec<StationName> {
        vec![Arc::from("X"), Arc::from("Y"), Arc::from("Z")]
    }

    #[test]
    fn rejects_empty_station() {
        let err = PathQuery::new(&directory(), "", "Y", None, None, false).unwrap_err();
        assert_eq!(err, QueryError::EmptyStation);
        let err = PathQuery::new(&directory(), "X", "", None, None, false).unwrap_err();
        assert_eq!(err, QueryError::EmptyStation);
    }

    #[test]
    fn rejects_same_station() {
        let err = PathQuery::new(&directory(), "X", "X", None, None, false).unwrap_err();
        assert_eq!(err, QueryError::SameStation);
    }

    #[test]
    fn rejects_unknown_station() {
        let err = PathQuery::new(&directory(), "X", "Q", None, None, false).unwrap_err();
        assert_eq!(err, QueryError::UnknownStation("Q".to_owned()));
    }

    #[test]
    fn rejects_max_transfers_above_ceiling() {
        let err = PathQuery::new(&directory(), "X", "Y", Some(3), None, false).unwrap_err();
        assert_eq!(err, QueryError::MaxTransfersOutOfRange(3));
    }

    #[test]
    fn rejects_window_minutes_above_ceiling() {
        let err = PathQuery::new(&directory(), "X", "Y", None, Some(481), false).unwrap_err();
        assert_eq!(err, QueryError::WindowMinutesOutOfRange(481));
    }

    #[test]
    fn applies_defaults_when_omitted() {
        let query = PathQuery::new(&directory(), "X", "Y", None, None, false).unwrap();
        assert_eq!(query.max_transfers, DEFAULT_MAX_TRANSFERS);
        assert_eq!(query.window_minutes, DEFAULT_WINDOW_MINUTES);
    }
}
