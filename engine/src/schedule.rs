//! Parses a schedule document into the train table, station directory and
//! direction map the graph builder consumes. A single entry point walks
//! the document and feeds a builder, collecting per-record errors as
//! named, not stringly-typed, error variants.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Deserialize;

use crate::time::{self, Minute, TimeParseError};

pub type TrainId = Arc<str>;
pub type StationName = Arc<str>;

#[derive(Debug, Clone)]
pub struct Train {
    pub id: TrainId,
    pub fast: bool,
    pub direction_vector: Option<Vec<i8>>,
    pub stops: Vec<(StationName, Minute)>,
}

/// The loader's three outputs.
#[derive(Debug)]
pub struct LoadedSchedule {
    pub train_table: Vec<Train>,
    pub station_directory: Vec<StationName>,
    pub direction_map: HashMap<TrainId, Vec<i8>>,
}

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("schedule document is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("duplicate train id {train_id:?}")]
    DuplicateTrain { train_id: String },
    #[error("train {train_id:?} has {len} stop(s), at least 2 are required")]
    TooFewStops { train_id: String, len: usize },
    #[error("train {train_id:?} stop time at index {index} is invalid: {source}")]
    InvalidTime {
        train_id: String,
        index: usize,
        #[source]
        source: TimeParseError,
    },
    #[error(
        "train {train_id:?} stops are not strictly monotonic at index {index} \
         (modulo the midnight wrap)"
    )]
    NonMonotonicStops { train_id: String, index: usize },
    #[error(
        "train {train_id:?} directionality[{index}] is {value}, must be in {{-1, 0, 1}}"
    )]
    InvalidDirectionValue {
        train_id: String,
        index: usize,
        value: i8,
    },
}

#[derive(Debug, Deserialize)]
struct ScheduleDocument {
    train: Vec<RawTrain>,
}

#[derive(Debug, Deserialize)]
struct RawTrain {
    id: String,
    is_fast: bool,
    #[serde(default)]
    directionality: Option<Vec<i8>>,
    stops: Vec<RawStop>,
}

#[derive(Debug, Deserialize)]
struct RawStop {
    station: String,
    time: String,
}

/// Parses and validates a schedule document from bytes. Each failure
/// surfaces as a discrete [`LoaderError`] variant naming the offending
/// train so a caller doesn't have to bisect the file.
pub fn load(bytes: &[u8]) -> Result<LoadedSchedule, LoaderError> {
    let document: ScheduleDocument = serde_json::from_slice(bytes)?;

    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut station_interner: HashMap<String, StationName> = HashMap::new();
    let mut station_directory_set: HashSet<StationName> = HashSet::new();
    let mut train_table = Vec::with_capacity(document.train.len());
    let mut direction_map = HashMap::new();

    for raw in document.train {
        if !seen_ids.insert(raw.id.clone()) {
            return Err(LoaderError::DuplicateTrain { train_id: raw.id });
        }
        if raw.stops.len() < 2 {
            return Err(LoaderError::TooFewStops {
                train_id: raw.id,
                len: raw.stops.len(),
            });
        }
        if let Some(vector) = &raw.directionality {
            for (index, &value) in vector.iter().enumerate() {
                if !(-1..=1).contains(&value) {
                    return Err(LoaderError::InvalidDirectionValue {
                        train_id: raw.id,
                        index,
                        value,
                    });
                }
            }
        }

        let mut stops = Vec::with_capacity(raw.stops.len());
        let mut previous: Option<Minute> = None;
        for (index, raw_stop) in raw.stops.into_iter().enumerate() {
            let time = time::parse(&raw_stop.time).map_err(|source| LoaderError::InvalidTime {
                train_id: raw.id.clone(),
                index,
                source,
            })?;
            if let Some(previous) = previous {
                if time.as_u16() <= previous.as_u16() {
                    return Err(LoaderError::NonMonotonicStops {
                        train_id: raw.id.clone(),
                        index,
                    });
                }
            }
            previous = Some(time);

            let station: StationName = station_interner
                .entry(raw_stop.station.clone())
                .or_insert_with(|| Arc::from(raw_stop.station.as_str()))
                .clone();
            station_directory_set.insert(station.clone());
            stops.push((station, time));
        }

        let id: TrainId = Arc::from(raw.id.as_str());
        if let Some(vector) = raw.directionality {
            direction_map.insert(id.clone(), vector.clone());
            train_table.push(Train {
                id,
                fast: raw.is_fast,
                direction_vector: Some(vector),
                stops,
            });
        } else {
            train_table.push(Train {
                id,
                fast: raw.is_fast,
                direction_vector: None,
                stops,
            });
        }
    }

    let mut station_directory: Vec<StationName> = station_directory_set.into_iter().collect();
    station_directory.sort();

    Ok(LoadedSchedule {
        train_table,
        station_directory,
        direction_map,
    })
}

/// Inert types for an alternative "fast-graph" wire format. No loader
/// path builds a [`crate::snapshot::Snapshot`] from this shape; kept here
/// so a future loader doesn't have to re-derive the format.
pub mod fast_graph {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct FastGraphDocument {
        pub nodes: Vec<(String, String, String)>,
        pub edges: Vec<FastGraphEdge>,
    }

    #[derive(Debug, Deserialize)]
    pub struct FastGraphEdge {
        pub from: (String, String, String),
        pub to: (String, String, String),
        #[serde(alias = "segment_travel_time")]
        pub weight: i64,
        #[serde(rename = "type")]
        pub kind: String,
    }
}
