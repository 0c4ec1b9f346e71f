//! Bundles a loaded schedule and its derived graph into the single
//! immutable unit the server swaps atomically on reload.
//!
//! Everything a query needs, built once from a schedule file and never
//! mutated in place: a reload builds a new one and swaps it in whole.

use std::collections::{HashMap, HashSet};

use crate::adjacency::Adjacency;
use crate::facade::QueryFacade;
use crate::graph::{self, GraphStats, Node, TransferPolicy};
use crate::schedule::{self, LoaderError, StationName, TrainId};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
}

/// The fully built, queryable state of one schedule file. Construct with
/// [`Snapshot::build`]; once built it never mutates, so concurrent readers
/// need no locking. The server holds one behind an `arc_swap::ArcSwap` so
/// a reload can replace it without blocking in-flight queries.
#[derive(Debug)]
pub struct Snapshot {
    station_directory: Vec<StationName>,
    direction_map: HashMap<TrainId, Vec<i8>>,
    fast_trains: HashSet<TrainId>,
    nodes: Vec<Node>,
    adjacency: Adjacency,
    stats: GraphStats,
}

impl Snapshot {
    pub fn build(schedule_bytes: &[u8], policy: TransferPolicy) -> Result<Snapshot, SnapshotError> {
        let loaded = schedule::load(schedule_bytes)?;
        let fast_trains = loaded
            .train_table
            .iter()
            .filter(|t| t.fast)
            .map(|t| t.id.clone())
            .collect();
        let (nodes, edges, stats) = graph::build(&loaded.train_table, policy);
        let adjacency = Adjacency::build(nodes.len(), &edges);

        tracing::info!(
            node_count = stats.node_count,
            travel_edges = stats.travel_edge_count,
            transfer_edges = stats.transfer_edge_count,
            train_count = loaded.train_table.len(),
            station_count = loaded.station_directory.len(),
            "built schedule snapshot"
        );

        Ok(Snapshot {
            station_directory: loaded.station_directory,
            direction_map: loaded.direction_map,
            fast_trains,
            nodes,
            adjacency,
            stats,
        })
    }

    pub fn station_directory(&self) -> &[StationName] {
        &self.station_directory
    }

    pub fn stats(&self) -> GraphStats {
        self.stats
    }

    pub fn facade(&self) -> QueryFacade<'_> {
        QueryFacade {
            nodes: &self.nodes,
            adjacency: &self.adjacency,
            fast_trains: &self.fast_trains,
            direction_map: &self.direction_map,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SAMPLE: &str = r#"{"train": [
        {"id": "T1", "is_fast": true, "stops": [
            {"station": "X", "time": "08:00"},
            {"station": "Y", "time": "08:30"}
        ]},
        {"id": "T2", "is_fast": false, "stops": [
            {"station": "Y", "time": "08:40"},
            {"station": "Z", "time": "09:10"}
        ]}
    ]}"#;

    #[test]
    fn builds_a_queryable_snapshot() {
        let snapshot = Snapshot::build(SAMPLE.as_bytes(), TransferPolicy::default()).unwrap();
        assert_eq!(snapshot.station_directory().len(), 3);
        assert_eq!(snapshot.stats().node_count, 4);
        assert_eq!(snapshot.stats().transfer_edge_count, 1);
    }

    #[test]
    fn rejects_a_malformed_schedule() {
        let err = Snapshot::build(b"not json", TransferPolicy::default()).unwrap_err();
        assert!(matches!(err, SnapshotError::Loader(LoaderError::Malformed(_))));
    }
}
