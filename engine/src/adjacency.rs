//! Dense-integer adjacency index over the time-expanded graph.
//!
//! Nodes live in a single flat array indexed by a dense integer; a hash
//! from (station, train, time) to index exists only during construction.
//! The hash lives in [`crate::graph::build`] and is dropped once indices
//! are assigned; this module only ever holds indices, never the temporary
//! lookup table.

use crate::graph::Edge;
use crate::time::MinuteDelta;

/// A dense index into the node array, stable for the lifetime of one
/// [`crate::snapshot::Snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(u32);

impl NodeIndex {
    pub(crate) fn new(index: usize) -> NodeIndex {
        NodeIndex(index.try_into().expect("node count exceeds u32::MAX"))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Travel,
    Transfer,
}

#[derive(Debug, Clone, Copy)]
pub struct AdjacencyEntry {
    pub target: NodeIndex,
    pub kind: EdgeKind,
    pub duration: MinuteDelta,
}

/// Outbound adjacency, indexed by [`NodeIndex`]. Immutable after
/// construction; requires no synchronization for concurrent reads.
#[derive(Debug)]
pub struct Adjacency {
    outbound: Vec<Vec<AdjacencyEntry>>,
}

impl Adjacency {
    /// Builds the index from a node count and an edge list. Edges whose
    /// endpoints are out of range are dropped. The graph builder never
    /// produces such an edge; the drop path only protects against a future
    /// caller handing in a hand-built edge list.
    pub fn build(node_count: usize, edges: &[Edge]) -> Adjacency {
        let mut outbound = vec![Vec::new(); node_count];
        for edge in edges {
            let Some(bucket) = outbound.get_mut(edge.from.index()) else {
                continue;
            };
            if edge.to.index() >= node_count {
                continue;
            }
            bucket.push(AdjacencyEntry {
                target: edge.to,
                kind: edge.kind,
                duration: edge.duration,
            });
        }
        Adjacency { outbound }
    }

    pub fn outbound(&self, node: NodeIndex) -> &[AdjacencyEntry] {
        self.outbound
            .get(node.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.outbound.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::Edge;

    #[test]
    fn drops_edges_referencing_unknown_nodes() {
        let edges = vec![Edge {
            from: NodeIndex::new(0),
            to: NodeIndex::new(5),
            kind: EdgeKind::Travel,
            duration: MinuteDelta::minutes(10),
        }];
        let adjacency = Adjacency::build(2, &edges);
        assert!(adjacency.outbound(NodeIndex::new(0)).is_empty());
    }

    #[test]
    fn indexes_edges_by_source_node() {
        let edges = vec![Edge {
            from: NodeIndex::new(0),
            to: NodeIndex::new(1),
            kind: EdgeKind::Travel,
            duration: MinuteDelta::minutes(10),
        }];
        let adjacency = Adjacency::build(2, &edges);
        assert_eq!(adjacency.outbound(NodeIndex::new(0)).len(), 1);
        assert!(adjacency.outbound(NodeIndex::new(1)).is_empty());
    }
}
