//! Builds the time-expanded graph from a loaded schedule: one node per
//! stop of each train, travel edges linking consecutive stops of a train,
//! and transfer edges linking same-station nodes of different trains
//! within a configured wait window.
//!
//! Time is encoded in the node rather than on the edge, which makes the
//! enumerator a standard graph walk.

use std::collections::HashMap;

use crate::adjacency::{EdgeKind, NodeIndex};
use crate::schedule::{StationName, Train, TrainId};
use crate::time::{self, Minute, MinuteDelta};

#[derive(Debug, Clone)]
pub struct Node {
    pub station: StationName,
    pub train: TrainId,
    pub time: Minute,
}

#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub kind: EdgeKind,
    pub duration: MinuteDelta,
}

/// Transfer edge generation window. A build parameter, never inferred
/// from the schedule data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPolicy {
    pub min_connect_minutes: u16,
    pub max_wait_minutes: u16,
}

impl Default for TransferPolicy {
    /// `min_connect >= 1, max_wait in the tens to low hundreds of minutes`.
    fn default() -> TransferPolicy {
        TransferPolicy {
            min_connect_minutes: 1,
            max_wait_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub node_count: usize,
    pub travel_edge_count: usize,
    pub transfer_edge_count: usize,
}

/// Builds nodes and edges from a train table. Returns the node array (in
/// the dense order [`crate::adjacency::NodeIndex`] values address) and the
/// edge list, ready for [`crate::adjacency::Adjacency::build`].
pub fn build(train_table: &[Train], policy: TransferPolicy) -> (Vec<Node>, Vec<Edge>, GraphStats) {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut stations: HashMap<StationName, Vec<NodeIndex>> = HashMap::new();

    for train in train_table {
        let first_index = NodeIndex::new(nodes.len());
        for (station, stop_time) in &train.stops {
            let index = NodeIndex::new(nodes.len());
            nodes.push(Node {
                station: station.clone(),
                train: train.id.clone(),
                time: *stop_time,
            });
            stations.entry(station.clone()).or_default().push(index);
        }
        let stop_count = train.stops.len();
        for offset in 0..stop_count.saturating_sub(1) {
            let from = NodeIndex::new(first_index.index() + offset);
            let to = NodeIndex::new(first_index.index() + offset + 1);
            let (_, from_time) = train.stops[offset];
            let (_, to_time) = train.stops[offset + 1];
            let duration = time::duration(from_time, to_time);
            if duration.as_u16() == 0 {
                // Emit no travel edges of zero duration.
                continue;
            }
            edges.push(Edge {
                from,
                to,
                kind: EdgeKind::Travel,
                duration,
            });
        }
    }
    let travel_edge_count = edges.len();

    for station_nodes in stations.values() {
        for &u in station_nodes {
            for &v in station_nodes {
                if u == v {
                    continue;
                }
                if nodes[u.index()].train == nodes[v.index()].train {
                    continue;
                }
                let wait = time::duration(nodes[u.index()].time, nodes[v.index()].time);
                if wait.as_u16() >= policy.min_connect_minutes
                    && wait.as_u16() <= policy.max_wait_minutes
                {
                    edges.push(Edge {
                        from: u,
                        to: v,
                        kind: EdgeKind::Transfer,
                        duration: wait,
                    });
                }
            }
        }
    }

    let stats = GraphStats {
        node_count: nodes.len(),
        travel_edge_count,
        transfer_edge_count: edges.len() - travel_edge_count,
    };
    (nodes, edges, stats)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;

    fn train(id: &str, fast: bool, stops: &[(&str, &str)]) -> Train {
        Train {
            id: Arc::from(id),
            fast,
            direction_vector: None,
            stops: stops
                .iter()
                .map(|(station, t)| (Arc::from(*station), time::parse(t).unwrap()))
                .collect(),
        }
    }

    #[test]
    fn builds_travel_edges_for_consecutive_stops() {
        let trains = vec![train(
            "T1",
            true,
            &[("X", "08:00"), ("Y", "08:30"), ("Z", "09:00")],
        )];
        let (nodes, edges, stats) = build(&trains, TransferPolicy::default());
        assert_eq!(nodes.len(), 3);
        assert_eq!(stats.travel_edge_count, 2);
        assert_eq!(stats.transfer_edge_count, 0);
        assert!(edges
            .iter()
            .all(|e| matches!(e.kind, EdgeKind::Travel)));
    }

    #[test]
    fn builds_transfer_edge_within_policy_window() {
        let trains = vec![
            train("T1", false, &[("X", "08:00"), ("Y", "08:30")]),
            train("T2", false, &[("Y", "08:40"), ("Z", "09:10")]),
        ];
        let (_, _, stats) = build(&trains, TransferPolicy::default());
        // 08:30 -> 08:40 is a 10 minute wait, within the default window.
        assert_eq!(stats.transfer_edge_count, 1);
    }

    #[test]
    fn rejects_transfer_outside_wait_window() {
        let trains = vec![
            train("T1", false, &[("X", "08:00"), ("Y", "08:30")]),
            train("T2", false, &[("Y", "11:00"), ("Z", "11:30")]),
        ];
        let policy = TransferPolicy {
            min_connect_minutes: 1,
            max_wait_minutes: 60,
        };
        let (_, _, stats) = build(&trains, policy);
        assert_eq!(stats.transfer_edge_count, 0);
    }

    #[test]
    fn no_transfer_edge_between_nodes_of_the_same_train() {
        let trains = vec![train(
            "T1",
            false,
            &[("X", "08:00"), ("Y", "08:30"), ("X", "09:00")],
        )];
        let (_, _, stats) = build(&trains, TransferPolicy::default());
        assert_eq!(stats.transfer_edge_count, 0);
    }
}
