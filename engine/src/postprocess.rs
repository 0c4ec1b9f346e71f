//! Turns raw enumerator output into the ranked, de-duplicated, numbered
//! result list returned to a caller.
//!
//! Three steps, always in this order: window filter relative to the
//! fastest path found, a stable sort, then a merge pass that collapses
//! itineraries which agree on everything except which specific transfer
//! connection was used into one result with, per transfer step, the set
//! of alternative connections observed.

use crate::enumerator::{PathKind, PathSummary, TransferDetail};
use crate::schedule::TrainId;
use crate::time::Minute;

/// The alternative transfer connections observed for one boarding in a
/// merged itinerary. `step` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferStepOptions {
    pub step: u8,
    pub options: Vec<TransferDetail>,
}

/// One itinerary in a result set, with a caller-facing sequential id.
/// `transfer_details` is the representative option per step (the first
/// observed); `transfer_options` carries every alternative, one entry per
/// step, and has exactly one option per step unless a merge collapsed more
/// than one enumerated path into this result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPath {
    pub id: u64,
    pub kind: PathKind,
    pub train_sequence: Vec<TrainId>,
    pub transfer_count: u8,
    pub departure_time: Minute,
    pub arrival_time: Minute,
    pub total_minutes: u32,
    pub is_fast: bool,
    pub transfer_details: Vec<TransferDetail>,
    pub transfer_options: Vec<TransferStepOptions>,
}

#[derive(Debug, thiserror::Error)]
pub enum PostprocessError {
    #[error("no paths were found to establish a fastest-path baseline")]
    FastestUnavailable,
}

/// Counts surfaced alongside a [`RankedPath`] list so a caller can report
/// a summary object without re-deriving them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostprocessSummary {
    pub total_paths: usize,
    pub fastest_minutes: u32,
    pub window_minutes: u32,
    pub filtered_paths: usize,
    pub merged_paths: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostprocessOutput {
    pub paths: Vec<RankedPath>,
    pub summary: PostprocessSummary,
}

/// Runs the window filter, sort and merge over raw enumerator output.
/// `window_minutes` is the caller-supplied slack above the fastest path's
/// `total_minutes`; callers pass an already-clamped non-negative value
/// (see [`crate::facade::PathQuery`]).
pub fn process(paths: Vec<PathSummary>, window_minutes: u32) -> PostprocessOutput {
    let total_paths = paths.len();
    if paths.is_empty() {
        return PostprocessOutput {
            paths: Vec::new(),
            summary: PostprocessSummary {
                total_paths: 0,
                fastest_minutes: 0,
                window_minutes,
                filtered_paths: 0,
                merged_paths: 0,
            },
        };
    }

    let fastest = paths
        .iter()
        .map(|p| p.total_minutes)
        .min()
        .expect("checked non-empty above");
    let ceiling = fastest + window_minutes;

    let mut windowed: Vec<PathSummary> = paths
        .into_iter()
        .filter(|p| p.total_minutes <= ceiling)
        .collect();
    let filtered_paths = windowed.len();

    windowed.sort_by(|a, b| {
        a.total_minutes
            .cmp(&b.total_minutes)
            .then_with(|| a.departure_time.cmp(&b.departure_time))
    });

    let merged = merge(windowed);
    let merged_paths = merged.len();

    PostprocessOutput {
        paths: merged,
        summary: PostprocessSummary {
            total_paths,
            fastest_minutes: fastest,
            window_minutes,
            filtered_paths,
            merged_paths,
        },
    }
}

/// Exposed for callers that need to assert a fastest path exists before
/// running [`process`] (none currently do; kept since the window filter
/// treats it as a distinct step).
pub fn fastest_total_minutes(paths: &[PathSummary]) -> Result<u32, PostprocessError> {
    paths
        .iter()
        .map(|p| p.total_minutes)
        .min()
        .ok_or(PostprocessError::FastestUnavailable)
}

/// Accumulates one merge group's per-step option lists before id
/// assignment and final [`TransferStepOptions`] construction.
struct Group {
    kind: PathKind,
    train_sequence: Vec<TrainId>,
    transfer_count: u8,
    departure_time: Minute,
    arrival_time: Minute,
    total_minutes: u32,
    is_fast: bool,
    representative: Vec<TransferDetail>,
    step_options: Vec<Vec<TransferDetail>>,
}

/// Groups itineraries sharing `(train_sequence, kind, transfer_count,
/// departure_time, arrival_time, total_minutes)` into one [`RankedPath`],
/// collapsing their per-step transfer detail into `transfer_options`.
/// Input must already be sorted; groups are emitted in first-seen order,
/// which for sorted input is the windowed-and-sorted order.
fn merge(sorted: Vec<PathSummary>) -> Vec<RankedPath> {
    let mut groups: Vec<Group> = Vec::new();

    for path in sorted {
        let existing = groups.iter_mut().find(|g| {
            g.train_sequence == path.train_sequence
                && g.kind == path.kind()
                && g.transfer_count == path.transfer_count()
                && g.departure_time == path.departure_time
                && g.arrival_time == path.arrival_time
                && g.total_minutes == path.total_minutes
        });

        match existing {
            Some(g) => {
                for (step, detail) in path.transfer_details.into_iter().enumerate() {
                    if !g.step_options[step].contains(&detail) {
                        g.step_options[step].push(detail);
                    }
                }
            }
            None => {
                let transfer_count = path.transfer_count();
                let step_options = path
                    .transfer_details
                    .iter()
                    .cloned()
                    .map(|detail| vec![detail])
                    .collect();
                groups.push(Group {
                    kind: path.kind(),
                    transfer_count,
                    train_sequence: path.train_sequence,
                    departure_time: path.departure_time,
                    arrival_time: path.arrival_time,
                    total_minutes: path.total_minutes,
                    is_fast: path.is_fast,
                    representative: path.transfer_details,
                    step_options,
                });
            }
        }
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(index, g)| RankedPath {
            id: (index + 1) as u64,
            kind: g.kind,
            transfer_count: g.transfer_count,
            train_sequence: g.train_sequence,
            departure_time: g.departure_time,
            arrival_time: g.arrival_time,
            total_minutes: g.total_minutes,
            is_fast: g.is_fast,
            transfer_details: g.representative,
            transfer_options: g
                .step_options
                .into_iter()
                .enumerate()
                .map(|(step, options)| TransferStepOptions {
                    step: (step + 1) as u8,
                    options,
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::enumerator::PathKind;
    use crate::time;
    use std::sync::Arc;

    fn summary(train_id: &str, departure: &str, total_minutes: u32, is_fast: bool) -> PathSummary {
        let departure_time = time::parse(departure).unwrap();
        PathSummary {
            train_sequence: vec![Arc::from(train_id)],
            transfer_details: Vec::new(),
            departure_time,
            arrival_time: departure_time + time::MinuteDelta::minutes(total_minutes as u16),
            total_minutes,
            is_fast,
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let output = process(Vec::new(), 120);
        assert!(output.paths.is_empty());
        assert_eq!(output.summary.total_paths, 0);
    }

    #[test]
    fn window_filter_drops_paths_far_slower_than_the_fastest() {
        let paths = vec![
            summary("T1", "08:00", 30, true),
            summary("T2", "08:00", 200, false),
        ];
        let output = process(paths, 60);
        assert_eq!(output.paths.len(), 1);
        assert_eq!(output.paths[0].total_minutes, 30);
        assert_eq!(output.summary.total_paths, 2);
        assert_eq!(output.summary.fastest_minutes, 30);
        assert_eq!(output.summary.filtered_paths, 1);
        assert_eq!(output.summary.merged_paths, 1);
    }

    #[test]
    fn sorts_by_total_minutes_then_departure_time() {
        let paths = vec![
            summary("T1", "09:00", 30, true),
            summary("T2", "08:00", 30, true),
            summary("T3", "08:00", 20, true),
        ];
        let output = process(paths, 480);
        let ordering: Vec<u32> = output.paths.iter().map(|p| p.total_minutes).collect();
        assert_eq!(ordering, vec![20, 30, 30]);
        assert_eq!(output.paths[1].departure_time, time::parse("08:00").unwrap());
        assert_eq!(output.paths[2].departure_time, time::parse("09:00").unwrap());
    }

    #[test]
    fn merges_paths_that_agree_on_everything_but_transfer_choice() {
        let mut a = summary("T1", "08:00", 70, false);
        a.train_sequence = vec![Arc::from("T1"), Arc::from("T2")];
        a.transfer_details = vec![TransferDetail {
            station: Arc::from("Y"),
            arrival_time: time::parse("08:30").unwrap(),
            departure_time: time::parse("08:40").unwrap(),
            wait_minutes: 10,
        }];
        let mut b = a.clone();
        b.transfer_details = vec![TransferDetail {
            station: Arc::from("Y"),
            arrival_time: time::parse("08:30").unwrap(),
            departure_time: time::parse("08:45").unwrap(),
            wait_minutes: 15,
        }];

        let output = process(vec![a, b], 0);
        assert_eq!(output.paths.len(), 1);
        let merged = &output.paths[0];
        assert_eq!(merged.kind, PathKind::Transfer);
        assert_eq!(merged.id, 1);
        assert_eq!(merged.transfer_details.len(), 1);
        assert_eq!(merged.transfer_options.len(), 1);
        assert_eq!(merged.transfer_options[0].step, 1);
        assert_eq!(merged.transfer_options[0].options.len(), 2);
        assert_eq!(output.summary.merged_paths, 1);
        assert_eq!(output.summary.filtered_paths, 2);
    }

    #[test]
    fn assigns_sequential_ids_starting_at_one() {
        let paths = vec![summary("T1", "08:00", 10, true), summary("T2", "09:00", 20, true)];
        let output = process(paths, 480);
        let ids: Vec<u64> = output.paths.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
