//! The layout coordinate store shared between the clustering engine, the
//! orchestration layer and whatever layout algorithm is currently relaxing
//! the graph.
//!
//! The store is the only synchronization contract this crate asks of a layout
//! algorithm: algorithms write through [LayoutStore::nudge], which refuses
//! locked vertices, while orchestration writes through [LayoutStore::set],
//! which does not care about locks. Everything runs on one logical model
//! thread; see the crate docs.

use crate::graph::{QueryableGraph, VertexId};
use ahash::RandomState;
use std::collections::{HashMap, HashSet};

/// A position in the shared layout plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Componentwise arithmetic mean, `None` for an empty input.
    pub fn centroid<I>(points: I) -> Option<Point>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut n = 0usize;
        let mut sx = 0.0;
        let mut sy = 0.0;
        for p in points {
            n += 1;
            sx += p.x;
            sy += p.y;
        }
        if n == 0 {
            None
        } else {
            Some(Point::new(sx / n as f64, sy / n as f64))
        }
    }
}

/// Positions keyed by vertex, with per-vertex and bulk lock flags.
///
/// Entries outlive collapse on purpose: member positions stay addressable
/// while their cluster vertex stands in for them, so a later expand drops
/// every member back where it was.
#[derive(Clone, Default)]
pub struct LayoutStore {
    positions: HashMap<VertexId, Point, RandomState>,
    locked: HashSet<VertexId, RandomState>,
    all_locked: bool,
}

impl LayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, v: &VertexId) -> Option<Point> {
        self.positions.get(v).copied()
    }

    /// Orchestration-side write. Ignores locks.
    pub fn set(&mut self, v: VertexId, p: Point) {
        self.positions.insert(v, p);
    }

    /// Drops the entry and its lock flag, e.g. when a cluster vertex dies.
    pub fn remove(&mut self, v: &VertexId) -> Option<Point> {
        self.locked.remove(v);
        self.positions.remove(v)
    }

    pub fn lock(&mut self, v: VertexId, locked: bool) {
        if locked {
            self.locked.insert(v);
        } else {
            self.locked.remove(&v);
        }
    }

    pub fn is_locked(&self, v: &VertexId) -> bool {
        self.all_locked || self.locked.contains(v)
    }

    /// Locks or unlocks every vertex at once, without touching the
    /// per-vertex flags.
    pub fn lock_all(&mut self, locked: bool) {
        self.all_locked = locked;
    }

    /// Algorithm-side write. Returns `false` without moving anything when
    /// `v` is locked.
    pub fn nudge(&mut self, v: VertexId, p: Point) -> bool {
        if self.is_locked(&v) {
            return false;
        }
        self.positions.insert(v, p);
        true
    }
}

/// The layout-algorithm collaborator interface.
///
/// Orchestration calls this after every topology change. Implementations must
/// move vertices only through [LayoutStore::nudge].
pub trait Relaxer {
    fn relax(&mut self, graph: &dyn QueryableGraph, store: &mut LayoutStore);
}
