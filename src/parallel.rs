//! Rendering ranks for parallel edges.
//!
//! When several edges connect the same endpoint pair, a renderer fans them
//! out by giving each one a stable integer rank. The rank of an edge is its
//! position, ordered by [EdgeId], among the non-excluded edges of its pair,
//! so ranks do not jump around as the cache is rebuilt.
//!
//! Ranks are cached lazily per pair. Collapse/expand rewrite edge endpoints
//! under unchanged ID's, which silently invalidates the cache; the caller
//! must invoke [ParallelEdgeIndex::reset] after every topology change. A
//! missed reset is a visual artifact (overlapping edges), not a crash.
//!
//! The exclusion set is a user display preference, edges drawn as one
//! compressed line at rank 0. It is independent of topology and survives
//! `reset()`.

use crate::graph::{Edge, EdgeId, QueryableGraph};
use ahash::RandomState;
use std::collections::{HashMap, HashSet};

#[derive(Clone, Default)]
pub struct ParallelEdgeIndex {
    ranks: HashMap<EdgeId, usize, RandomState>,
    excluded: HashSet<EdgeId, RandomState>,
}

impl ParallelEdgeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fan-out rank of `edge` among its endpoint pair. Excluded edges
    /// are always rank 0.
    pub fn rank(&mut self, graph: &dyn QueryableGraph, edge: &Edge) -> usize {
        if self.excluded.contains(&edge.id) {
            return 0;
        }
        if let Some(r) = self.ranks.get(&edge.id) {
            return *r;
        }
        let mut ids: Vec<EdgeId> = graph
            .edges_connecting(&edge.source, &edge.sink)
            .map(|e| e.id)
            .filter(|id| !self.excluded.contains(id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        for (i, id) in ids.iter().enumerate() {
            self.ranks.insert(*id, i);
        }
        self.ranks.get(&edge.id).copied().unwrap_or(0)
    }

    /// Drops every cached rank. The exclusion set stays.
    ///
    /// Must be called after every collapse/expand or other topology change.
    pub fn reset(&mut self) {
        self.ranks.clear();
    }

    /// Suppresses fan-out for `edges`. Idempotent.
    pub fn exclude<I>(&mut self, edges: I)
    where
        I: IntoIterator<Item = EdgeId>,
    {
        for e in edges {
            self.excluded.insert(e);
        }
        // remaining edges of the affected pairs re-rank on demand
        self.ranks.clear();
    }

    /// Re-enables fan-out for `edges`. Idempotent.
    pub fn include<I>(&mut self, edges: I)
    where
        I: IntoIterator<Item = EdgeId>,
    {
        for e in edges {
            self.excluded.remove(&e);
        }
        self.ranks.clear();
    }

    pub fn is_excluded(&self, e: &EdgeId) -> bool {
        self.excluded.contains(e)
    }
}
