//! Bounded-depth DFS enumeration of itineraries between two stations over
//! the time-expanded graph built by [`crate::graph`].
//!
//! Wants every itinerary up to a small transfer cap, not just the earliest
//! arrival, so it walks the graph with plain backtracking DFS rather than
//! a priority-queue frontier.

use std::collections::{HashMap, HashSet};

use crate::adjacency::{Adjacency, EdgeKind, NodeIndex};
use crate::cancellation::CancellationToken;
use crate::graph::Node;
use crate::schedule::{StationName, TrainId};
use crate::time::{Minute, MinuteDelta};

/// No itinerary may involve more than this many transfers, regardless of
/// what a caller asks for.
pub const HARD_CAP: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Direct,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransferDetail {
    pub station: StationName,
    pub arrival_time: Minute,
    pub departure_time: Minute,
    pub wait_minutes: u16,
}

/// One enumerated itinerary. Carries typed [`Minute`] values rather than
/// rendered strings; the facade and HTTP layer render them for the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSummary {
    pub train_sequence: Vec<TrainId>,
    pub transfer_details: Vec<TransferDetail>,
    pub departure_time: Minute,
    pub arrival_time: Minute,
    pub total_minutes: u32,
    pub is_fast: bool,
}

impl PathSummary {
    pub fn transfer_count(&self) -> u8 {
        self.transfer_details.len() as u8
    }

    pub fn kind(&self) -> PathKind {
        if self.transfer_details.is_empty() {
            PathKind::Direct
        } else {
            PathKind::Transfer
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumerationStats {
    pub paths_found: usize,
    pub skipped_same_station_transfers: usize,
    pub nodes_visited: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum EnumeratorError {
    #[error("enumeration was cancelled")]
    Cancelled,
}

/// Enumerates every itinerary from `start_station` to `end_station` with at
/// most `max_transfers` transfers (never more than [`HARD_CAP`] regardless
/// of what's requested).
///
/// `fast_trains` and `direction_map` are looked up by [`TrainId`]; a train
/// absent from `direction_map` is treated as having no directionality
/// constraint.
pub fn find_paths(
    nodes: &[Node],
    adjacency: &Adjacency,
    fast_trains: &HashSet<TrainId>,
    direction_map: &HashMap<TrainId, Vec<i8>>,
    start_station: &str,
    end_station: &str,
    max_transfers: u8,
    allow_same_station_consecutive_transfers: bool,
    cancellation: &CancellationToken,
) -> Result<(Vec<PathSummary>, EnumerationStats), EnumeratorError> {
    debug_assert!(max_transfers <= HARD_CAP);
    let max_transfers = max_transfers.min(HARD_CAP);

    let mut ctx = Ctx {
        nodes,
        adjacency,
        fast_trains,
        direction_map,
        end_station,
        max_transfers,
        allow_same_station_consecutive_transfers,
        cancellation,
        stats: EnumerationStats::default(),
        paths: Vec::new(),
    };

    for (index, node) in nodes.iter().enumerate() {
        if &*node.station != start_station {
            continue;
        }
        let start = NodeIndex::new(index);
        let mut visited = HashSet::new();
        visited.insert(start);
        let mut edge_trace = Vec::new();
        let mut trains = vec![node.train.clone()];
        ctx.dfs(start, 0, &mut visited, &mut edge_trace, &mut trains, None)?;
    }

    ctx.stats.paths_found = ctx.paths.len();
    Ok((ctx.paths, ctx.stats))
}

struct TraceStep {
    from: NodeIndex,
    kind: EdgeKind,
    duration: MinuteDelta,
}

struct Ctx<'a> {
    nodes: &'a [Node],
    adjacency: &'a Adjacency,
    fast_trains: &'a HashSet<TrainId>,
    direction_map: &'a HashMap<TrainId, Vec<i8>>,
    end_station: &'a str,
    max_transfers: u8,
    allow_same_station_consecutive_transfers: bool,
    cancellation: &'a CancellationToken,
    stats: EnumerationStats,
    paths: Vec<PathSummary>,
}

impl<'a> Ctx<'a> {
    fn dfs(
        &mut self,
        current: NodeIndex,
        transfers: u8,
        visited: &mut HashSet<NodeIndex>,
        edge_trace: &mut Vec<TraceStep>,
        trains: &mut Vec<TrainId>,
        last_transfer_station: Option<StationName>,
    ) -> Result<(), EnumeratorError> {
        if self.cancellation.is_cancelled() {
            return Err(EnumeratorError::Cancelled);
        }
        self.stats.nodes_visited += 1;

        let here = &self.nodes[current.index()];
        if &*here.station == self.end_station && !edge_trace.is_empty() {
            let summary = self.summarize(edge_trace, trains);
            if summary.transfer_count() == 0 || self.direction_compatible(trains) {
                self.paths.push(summary);
            }
            return Ok(());
        }

        for entry in self.adjacency.outbound(current) {
            if visited.contains(&entry.target) {
                continue;
            }
            if entry.duration.as_u16() == 0 {
                continue;
            }
            let target_node = &self.nodes[entry.target.index()];
            let is_transfer =
                matches!(entry.kind, EdgeKind::Transfer) || target_node.train != here.train;

            if is_transfer
                && !self.allow_same_station_consecutive_transfers
                && last_transfer_station.as_deref() == Some(&*here.station)
            {
                self.stats.skipped_same_station_transfers += 1;
                continue;
            }

            let new_transfers = transfers + u8::from(is_transfer);
            if new_transfers > self.max_transfers {
                continue;
            }

            let pushed_train = if trains.last() != Some(&target_node.train) {
                trains.push(target_node.train.clone());
                true
            } else {
                false
            };
            visited.insert(entry.target);
            edge_trace.push(TraceStep {
                from: current,
                kind: entry.kind,
                duration: entry.duration,
            });
            let next_last_transfer_station = if is_transfer {
                Some(here.station.clone())
            } else {
                last_transfer_station.clone()
            };

            let result = self.dfs(
                entry.target,
                new_transfers,
                visited,
                edge_trace,
                trains,
                next_last_transfer_station,
            );

            edge_trace.pop();
            visited.remove(&entry.target);
            if pushed_train {
                trains.pop();
            }
            result?;
        }
        Ok(())
    }

    /// Walks the recorded edge trace to compute arrival/departure times,
    /// total duration and transfer detail. `total_minutes` is the literal
    /// sum of edge durations, which also equals `arrival - departure` as
    /// long as the itinerary doesn't span more than a calendar day.
    fn summarize(&self, edge_trace: &[TraceStep], trains: &[TrainId]) -> PathSummary {
        let departure_time = self.nodes[edge_trace[0].from.index()].time;
        let mut elapsed: u32 = u32::from(departure_time.as_u16());
        let mut transfer_details = Vec::new();

        for step in edge_trace {
            let arrival_before = elapsed;
            elapsed += u32::from(step.duration.as_u16());
            if let EdgeKind::Transfer = step.kind {
                transfer_details.push(TransferDetail {
                    station: self.nodes[step.from.index()].station.clone(),
                    arrival_time: Minute::from_raw((arrival_before % 1440) as u16),
                    departure_time: Minute::from_raw((elapsed % 1440) as u16),
                    wait_minutes: step.duration.as_u16(),
                });
            }
        }

        let total_minutes = elapsed - u32::from(departure_time.as_u16());
        let arrival_time = Minute::from_raw((elapsed % 1440) as u16);
        let is_fast = trains.iter().any(|t| self.fast_trains.contains(t));

        PathSummary {
            train_sequence: trains.to_vec(),
            transfer_details,
            departure_time,
            arrival_time,
            total_minutes,
            is_fast,
        }
    }

    /// Adjacent trains in the sequence must not disagree on any shared,
    /// non-zero direction-vector index: a negative-sign pair means one
    /// train runs outbound where the other runs inbound along that line,
    /// which is never a valid connection. A train absent from
    /// `direction_map` imposes no constraint.
    fn direction_compatible(&self, trains: &[TrainId]) -> bool {
        for pair in trains.windows(2) {
            let (Some(a), Some(b)) = (
                self.direction_map.get(&pair[0]),
                self.direction_map.get(&pair[1]),
            ) else {
                continue;
            };
            for (&x, &y) in a.iter().zip(b.iter()) {
                if x != 0 && y != 0 && x == -y {
                    return false;
                }
            }
        }
        true
    }
}
