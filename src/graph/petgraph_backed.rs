use crate::graph::*;
use ahash::RandomState;
use bimap::BiHashMap;
use petgraph::{
    graph::{EdgeIndex, NodeIndex},
    stable_graph::StableUnGraph,
    visit::EdgeRef,
};
use std::collections::BTreeSet;

/// A petgraph-backed undirected multigraph.
///
/// petgraph allocates its own indices and may reuse them after removals, so a
/// pair of bimaps bridges the stable external [VertexId]/[EdgeId] space to the
/// internal index space. That indirection is what makes [RestorableGraph]
/// expressible on top of petgraph at all.
#[derive(Clone)]
pub struct PetgraphBackedGraph {
    inner: StableUnGraph<VertexId, Edge, usize>,
    vid_factory: VertexIdFactory,
    eid_factory: EdgeIdFactory,
    vmap: BiHashMap<VertexId, usize, RandomState, RandomState>,
    emap: BiHashMap<EdgeId, usize, RandomState, RandomState>,
}

impl PetgraphBackedGraph {
    fn node_index(&self, v: &VertexId) -> Option<NodeIndex<usize>> {
        self.vmap.get_by_left(v).map(|raw| NodeIndex::new(*raw))
    }

    fn edge_index(&self, e: &EdgeId) -> Option<EdgeIndex<usize>> {
        self.emap.get_by_left(e).map(|raw| EdgeIndex::new(*raw))
    }
}

impl GrowableGraph for PetgraphBackedGraph {
    fn new() -> Self {
        Self {
            inner: StableUnGraph::<VertexId, Edge, usize>::with_capacity(0, 0),
            vid_factory: VertexIdFactory::new(),
            eid_factory: EdgeIdFactory::new(),
            vmap: BiHashMap::with_hashers(RandomState::new(), RandomState::new()),
            emap: BiHashMap::with_hashers(RandomState::new(), RandomState::new()),
        }
    }

    fn add_vertex(&mut self) -> VertexId {
        let vid = self.vid_factory.one_more();
        let idx = self.inner.add_node(vid);
        self.vmap.insert(vid, idx.index());
        vid
    }

    fn add_edge(&mut self, source: VertexId, sink: VertexId) -> EdgeId {
        let a = self.node_index(&source).unwrap();
        let b = self.node_index(&sink).unwrap();
        let eid = self.eid_factory.one_more();
        let idx = self.inner.add_edge(
            a,
            b,
            Edge {
                id: eid,
                source,
                sink,
            },
        );
        self.emap.insert(eid, idx.index());
        eid
    }
}

impl RestorableGraph for PetgraphBackedGraph {
    fn restore_vertex(&mut self, v: VertexId) {
        debug_assert!(!self.vmap.contains_left(&v));
        self.vid_factory.advance_past(v);
        let idx = self.inner.add_node(v);
        self.vmap.insert(v, idx.index());
    }

    fn restore_edge(&mut self, e: Edge) {
        debug_assert!(!self.emap.contains_left(&e.id));
        let a = self.node_index(&e.source).unwrap();
        let b = self.node_index(&e.sink).unwrap();
        self.eid_factory.advance_past(e.id);
        let eid = e.id;
        let idx = self.inner.add_edge(a, b, e);
        self.emap.insert(eid, idx.index());
    }
}

impl EdgeShrinkableGraph for PetgraphBackedGraph {
    fn remove_edge(&mut self, edge: &EdgeId) -> Option<Edge> {
        let idx = self.edge_index(edge)?;
        let removed = self.inner.remove_edge(idx);
        debug_assert!(removed.is_some());
        self.emap.remove_by_left(edge);
        removed
    }
}

impl VertexShrinkableGraph for PetgraphBackedGraph {
    fn remove_vertex(&mut self, vertex: &VertexId) -> Box<dyn Iterator<Item = Edge> + 'static> {
        let idx = match self.node_index(vertex) {
            Some(idx) => idx,
            None => return Box::new(std::iter::empty()),
        };
        let incident: BTreeSet<Edge> = self.inner.edges(idx).map(|e| e.weight().clone()).collect();
        for e in incident.iter() {
            self.emap.remove_by_left(&e.id);
        }
        self.inner.remove_node(idx);
        self.vmap.remove_by_left(vertex);
        Box::new(incident.into_iter())
    }
}

impl QueryableGraph for PetgraphBackedGraph {
    fn vertex_size(&self) -> usize {
        self.inner.node_count()
    }

    fn iter_vertices(&self) -> Box<dyn Iterator<Item = VertexId> + '_> {
        let it = self
            .inner
            .node_indices()
            .map(|idx| *self.inner.node_weight(idx).unwrap());
        Box::new(it)
    }

    fn contains_vertex(&self, v: &VertexId) -> bool {
        self.vmap.contains_left(v)
    }

    fn edge_size(&self) -> usize {
        self.inner.edge_count()
    }

    fn iter_edges(&self) -> Box<dyn Iterator<Item = Edge> + '_> {
        let it = self
            .inner
            .edge_indices()
            .map(|idx| self.inner.edge_weight(idx).unwrap().clone());
        Box::new(it)
    }

    fn contains_edge(&self, e: &EdgeId) -> bool {
        self.emap.contains_left(e)
    }

    fn find_edge(&self, e: &EdgeId) -> Option<Edge> {
        let idx = self.edge_index(e)?;
        self.inner.edge_weight(idx).cloned()
    }

    fn incident_edges(&self, v: &VertexId) -> Box<dyn Iterator<Item = Edge> + '_> {
        match self.node_index(v) {
            Some(idx) => Box::new(self.inner.edges(idx).map(|e| e.weight().clone())),
            None => Box::new(std::iter::empty()),
        }
    }

    fn edges_connecting(
        &self,
        source: &VertexId,
        sink: &VertexId,
    ) -> Box<dyn Iterator<Item = Edge> + '_> {
        match (self.node_index(source), self.node_index(sink)) {
            (Some(a), Some(b)) => Box::new(
                self.inner
                    .edges_connecting(a, b)
                    .map(|e| e.weight().clone()),
            ),
            _ => Box::new(std::iter::empty()),
        }
    }
}
