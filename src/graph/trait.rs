use crate::graph::*;
use std::collections::{BTreeMap, BTreeSet};

pub trait GrowableGraph {
    fn new() -> Self;
    fn add_vertex(&mut self) -> VertexId;
    fn add_edge(&mut self, source: VertexId, sink: VertexId) -> EdgeId;
}

pub trait EdgeShrinkableGraph {
    fn remove_edge(&mut self, edge: &EdgeId) -> Option<Edge>;
}

pub trait VertexShrinkableGraph: EdgeShrinkableGraph {
    /// Removes a vertex and every edge incident on it, returning those edges.
    fn remove_vertex(&mut self, vertex: &VertexId) -> Box<dyn Iterator<Item = Edge> + 'static>;
}

/// Insertion with caller-chosen ID's.
///
/// Collapse/expand must preserve vertex and edge identity while rewriting
/// endpoints, so the engine needs more than the mint-only [GrowableGraph]
/// interface. Implementations must advance their ID factories past restored
/// ID's so later `add_*` calls never collide.
pub trait RestorableGraph: GrowableGraph {
    /// Inserts a vertex under an ID chosen by the caller.
    ///
    /// The ID must not be present in the graph.
    fn restore_vertex(&mut self, v: VertexId);

    /// Inserts an edge under an ID chosen by the caller.
    ///
    /// Both endpoints must be present and the edge ID must not be.
    fn restore_edge(&mut self, e: Edge);
}

pub trait QueryableGraph {
    fn vertex_size(&self) -> usize;
    fn iter_vertices(&self) -> Box<dyn Iterator<Item = VertexId> + '_>;
    fn contains_vertex(&self, v: &VertexId) -> bool;

    fn edge_size(&self) -> usize;
    fn iter_edges(&self) -> Box<dyn Iterator<Item = Edge> + '_>;
    fn contains_edge(&self, e: &EdgeId) -> bool;
    fn find_edge(&self, e: &EdgeId) -> Option<Edge>;
    /// Iterates over edges between two endpoints, in either stored
    /// orientation. For self-loops pass the vertex twice.
    fn edges_connecting(
        &self,
        source: &VertexId,
        sink: &VertexId,
    ) -> Box<dyn Iterator<Item = Edge> + '_>;
    /// Iterates over edges with `v` as either endpoint. Self-loops show up
    /// once.
    fn incident_edges(&self, v: &VertexId) -> Box<dyn Iterator<Item = Edge> + '_>;

    fn debug<'a>(&'a self) -> GraphDebug<'a, Self>
    where
        Self: Sized,
    {
        GraphDebug::new(self)
    }
}

/// Structural equality: same vertex set, same edge ID's with the same stored
/// endpoints. Usable across backends.
pub fn same_graph<G1, G2>(a: &G1, b: &G2) -> bool
where
    G1: QueryableGraph,
    G2: QueryableGraph,
{
    let av: BTreeSet<VertexId> = a.iter_vertices().collect();
    let bv: BTreeSet<VertexId> = b.iter_vertices().collect();
    if av != bv {
        return false;
    }
    let ae: BTreeMap<EdgeId, (VertexId, VertexId)> =
        a.iter_edges().map(|e| (e.id, (e.source, e.sink))).collect();
    let be: BTreeMap<EdgeId, (VertexId, VertexId)> =
        b.iter_edges().map(|e| (e.id, (e.source, e.sink))).collect();
    ae == be
}
