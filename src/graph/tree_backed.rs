use crate::graph::*;
use std::collections::{BTreeMap, BTreeSet};

/// A tree-backed undirected multigraph.
///
/// For any graph operations, this is probably not the fastest implementation.
/// But it is balanced.
/// For all point queries, it is $O(\log n)$; for all iterations, it is amortized $O(1)$.
/// Besides, iterations are always in the order of vertex/edge insertion order,
/// which keeps collapse/expand deterministic.
#[derive(Clone)]
pub struct TreeBackedGraph {
    vid_factory: VertexIdFactory,
    eid_factory: EdgeIdFactory,
    vertices: BTreeSet<VertexId>,
    edges: BTreeMap<EdgeId, (VertexId, VertexId)>,
    adjacent_edges: BTreeSet<(VertexId, VertexId, EdgeId)>,
}

impl std::fmt::Debug for TreeBackedGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "TreeBackedGraph {{")?;
        for v in self.vertices.iter() {
            writeln!(f, "{:?}:", v)?;
            for e in self.incident_edges(v) {
                let peer = if e.source == *v { e.sink } else { e.source };
                writeln!(f, "  -- {:?} by {:?}", peer, e.id)?;
            }
        }
        writeln!(f, "}}")?;
        Ok(())
    }
}

impl std::cmp::PartialEq for TreeBackedGraph {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices && self.edges == other.edges
    }
}

impl std::cmp::Eq for TreeBackedGraph {}

impl GrowableGraph for TreeBackedGraph {
    fn new() -> Self {
        Self {
            vid_factory: VertexIdFactory::new(),
            eid_factory: EdgeIdFactory::new(),
            vertices: BTreeSet::new(),
            edges: BTreeMap::new(),
            adjacent_edges: BTreeSet::new(),
        }
    }

    fn add_vertex(&mut self) -> VertexId {
        let vid = self.vid_factory.one_more();
        self.vertices.insert(vid);
        vid
    }

    fn add_edge(&mut self, source: VertexId, sink: VertexId) -> EdgeId {
        debug_assert!(self.vertices.contains(&source));
        debug_assert!(self.vertices.contains(&sink));
        let eid = self.eid_factory.one_more();
        self.edges.insert(eid, (source, sink));
        self.adjacent_edges.insert((sink, source, eid));
        self.adjacent_edges.insert((source, sink, eid));
        eid
    }
}

impl RestorableGraph for TreeBackedGraph {
    fn restore_vertex(&mut self, v: VertexId) {
        debug_assert!(!self.vertices.contains(&v));
        self.vid_factory.advance_past(v);
        self.vertices.insert(v);
    }

    fn restore_edge(&mut self, e: Edge) {
        debug_assert!(self.vertices.contains(&e.source));
        debug_assert!(self.vertices.contains(&e.sink));
        debug_assert!(!self.edges.contains_key(&e.id));
        self.eid_factory.advance_past(e.id);
        self.edges.insert(e.id, (e.source, e.sink));
        self.adjacent_edges.insert((e.sink, e.source, e.id));
        self.adjacent_edges.insert((e.source, e.sink, e.id));
    }
}

impl EdgeShrinkableGraph for TreeBackedGraph {
    fn remove_edge(&mut self, edge: &EdgeId) -> Option<Edge> {
        match self.edges.remove(edge) {
            None => None,
            Some((src, snk)) => {
                self.adjacent_edges.remove(&(snk, src, *edge));
                self.adjacent_edges.remove(&(src, snk, *edge));
                Some(Edge {
                    id: *edge,
                    source: src,
                    sink: snk,
                })
            }
        }
    }
}

impl VertexShrinkableGraph for TreeBackedGraph {
    fn remove_vertex(&mut self, vertex: &VertexId) -> Box<dyn Iterator<Item = Edge> + 'static> {
        if !self.vertices.remove(vertex) {
            return Box::new(std::iter::empty());
        }
        let start = (*vertex, VertexId::MIN, EdgeId::MIN);
        let end = (vertex.next(), VertexId::MIN, EdgeId::MIN);
        let res: BTreeSet<_> = self
            .adjacent_edges
            .range(start..end)
            .map(|(_, _, eid)| *eid)
            .collect();
        let res: BTreeSet<_> = res
            .into_iter()
            .filter_map(|eid| self.remove_edge(&eid))
            .collect();
        Box::new(res.into_iter())
    }
}

impl QueryableGraph for TreeBackedGraph {
    fn vertex_size(&self) -> usize {
        self.vertices.len()
    }

    fn iter_vertices(&self) -> Box<dyn Iterator<Item = VertexId> + '_> {
        Box::new(self.vertices.iter().copied())
    }

    fn contains_vertex(&self, v: &VertexId) -> bool {
        self.vertices.contains(v)
    }

    fn edge_size(&self) -> usize {
        self.edges.len()
    }

    fn iter_edges(&self) -> Box<dyn Iterator<Item = Edge> + '_> {
        Box::new(self.edges.iter().map(|(e, (src, snk))| Edge {
            id: *e,
            source: *src,
            sink: *snk,
        }))
    }

    fn contains_edge(&self, e: &EdgeId) -> bool {
        self.edges.contains_key(e)
    }

    fn find_edge(&self, e: &EdgeId) -> Option<Edge> {
        self.edges.get(e).map(|(src, snk)| Edge {
            id: *e,
            source: *src,
            sink: *snk,
        })
    }

    fn incident_edges(&self, v: &VertexId) -> Box<dyn Iterator<Item = Edge> + '_> {
        let start = (*v, VertexId::MIN, EdgeId::MIN);
        let end = (v.next(), VertexId::MIN, EdgeId::MIN);
        let it = self
            .adjacent_edges
            .range(start..end)
            .map(|(_, _, eid)| self.find_edge(eid).unwrap());
        Box::new(it)
    }

    fn edges_connecting<'a, 'b>(
        &'a self,
        source: &'b VertexId,
        sink: &'b VertexId,
    ) -> Box<dyn Iterator<Item = Edge> + 'a> {
        let start = (*source, *sink, EdgeId::MIN);
        let end = (*source, *sink, EdgeId::MAX);
        let it = self
            .adjacent_edges
            .range(start..=end)
            .map(|(_, _, eid)| self.find_edge(eid).unwrap());
        Box::new(it)
    }
}
