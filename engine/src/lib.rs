//! Core itinerary-planning engine: loads a schedule, builds a
//! time-expanded graph over it, and answers station-to-station itinerary
//! queries against it.
//!
//! This crate has no knowledge of HTTP, configuration, or process
//! lifecycle; see the `server` crate for that. It is organized the way
//! the data flows: [`schedule`] parses, [`graph`] and [`adjacency`] derive
//! a queryable structure from what was parsed, [`enumerator`] walks it,
//! [`postprocess`] ranks what the walk found, and [`facade`] is the single
//! entry point that ties those three together behind one validated
//! request type. [`snapshot`] bundles the whole built state into the unit
//! a caller reloads as one piece.

pub mod adjacency;
pub mod cancellation;
pub mod enumerator;
pub mod facade;
pub mod graph;
pub mod postprocess;
pub mod schedule;
pub mod snapshot;
pub mod time;

pub use cancellation::CancellationToken;
pub use facade::{PathQuery, QueryError, QueryFacade, QueryResult};
pub use postprocess::{PostprocessSummary, RankedPath, TransferStepOptions};
pub use snapshot::{Snapshot, SnapshotError};
