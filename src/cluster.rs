//! Collapse a selected vertex set into one synthetic cluster vertex and
//! expand it back, without losing or duplicating edges.
//!
//! The engine owns the current top-level graph. Every successful collapse or
//! expand swaps in a rebuilt graph and bumps a [GraphVersion], so callers get
//! a clear before/after boundary instead of a shared mutable graph reference.
//!
//! Cluster vertices are ordinary [VertexId]'s; whether a vertex is a cluster
//! is answered by a side table of [ClusterRecord]'s rather than by the vertex
//! itself. Records nest: a collapse whose selection contains an existing
//! cluster vertex wraps that vertex as a direct member, and one expand
//! unwraps exactly one level.
//!
//! Callers that keep a [crate::parallel::ParallelEdgeIndex] must `reset()` it
//! after every collapse/expand; edges keep their ID's but change endpoints,
//! so cached ranks go stale.

use crate::graph::*;
use crate::layout::{LayoutStore, Point};
use ahash::RandomState;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Counts topology changes made through a [ClusterEngine].
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Default)]
pub struct GraphVersion(pub u64);

impl GraphVersion {
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

/// Everything needed to undo one collapse.
///
/// Born at collapse time, consumed by the matching expand. The member set is
/// exactly the vertex set of the induced subgraph; the cluster vertex itself
/// is never a member.
pub struct ClusterRecord<G> {
    cluster_vertex: VertexId,
    members: HashSet<VertexId, RandomState>,
    induced: G,
    /// Pre-rewrite endpoints of every edge that was rerouted onto the
    /// cluster vertex. Not re-derivable afterwards, hence stored.
    rewired: HashMap<EdgeId, Edge, RandomState>,
    anchor: Point,
}

impl<G> ClusterRecord<G> {
    pub fn cluster_vertex(&self) -> VertexId {
        self.cluster_vertex
    }

    pub fn members(&self) -> &HashSet<VertexId, RandomState> {
        &self.members
    }

    /// The subgraph the cluster wraps: the members and every edge of the
    /// pre-collapse graph with both endpoints among them.
    pub fn induced_subgraph(&self) -> &G {
        &self.induced
    }

    /// Centroid of the members at collapse time.
    pub fn anchor(&self) -> Point {
        self.anchor
    }
}

/// The collapse/expand engine. Owns the current top-level graph.
pub struct ClusterEngine<G> {
    graph: G,
    records: HashMap<VertexId, ClusterRecord<G>, RandomState>,
    version: GraphVersion,
}

impl<G> ClusterEngine<G>
where
    G: QueryableGraph + RestorableGraph + VertexShrinkableGraph + Clone,
{
    pub fn new(graph: G) -> Self {
        Self {
            graph,
            records: HashMap::with_hasher(RandomState::new()),
            version: GraphVersion::default(),
        }
    }

    /// The current top-level graph.
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// Bumped by every successful collapse/expand.
    pub fn version(&self) -> GraphVersion {
        self.version
    }

    pub fn is_cluster(&self, v: &VertexId) -> bool {
        self.records.contains_key(v)
    }

    /// Direct members of a cluster vertex, one level deep.
    pub fn members_of(&self, v: &VertexId) -> Option<&HashSet<VertexId, RandomState>> {
        self.records.get(v).map(|r| &r.members)
    }

    pub fn cluster_record(&self, v: &VertexId) -> Option<&ClusterRecord<G>> {
        self.records.get(v)
    }

    /// Every live cluster vertex, including ones currently wrapped inside
    /// other clusters.
    pub fn cluster_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.records.keys().copied()
    }

    /// Replaces `selected` by a fresh cluster vertex wrapping their induced
    /// subgraph.
    ///
    /// Edges with both endpoints selected move into the induced subgraph;
    /// edges with exactly one endpoint selected keep their ID and get that
    /// endpoint rewritten to the cluster vertex; everything else is
    /// untouched. The cluster vertex lands in `layout` at the members'
    /// centroid, locked, so an in-flight relaxation cannot drag it away
    /// before the caller unlocks it.
    ///
    /// A selection smaller than two, or containing an unknown vertex, is a
    /// no-op returning `None`.
    pub fn collapse(
        &mut self,
        layout: &mut LayoutStore,
        selected: &BTreeSet<VertexId>,
    ) -> Option<VertexId> {
        if selected.len() < 2 {
            return None;
        }
        if selected.iter().any(|v| !self.graph.contains_vertex(v)) {
            return None;
        }

        let edges_before = self.graph.edge_size();
        let mut inner = vec![];
        let mut crossing = vec![];
        for e in self.graph.iter_edges() {
            match (selected.contains(&e.source), selected.contains(&e.sink)) {
                (true, true) => inner.push(e),
                (false, false) => {}
                _ => crossing.push(e),
            }
        }

        let mut induced = G::new();
        for v in selected.iter() {
            induced.restore_vertex(*v);
        }
        for e in inner.iter() {
            induced.restore_edge(e.clone());
        }

        let mut next = self.graph.clone();
        let cluster_vertex = next.add_vertex();
        let mut rewired = HashMap::with_hasher(RandomState::new());
        for e in crossing.iter() {
            let removed = next.remove_edge(&e.id);
            debug_assert!(removed.is_some());
            rewired.insert(e.id, e.clone());
        }
        for v in selected.iter() {
            for dropped in next.remove_vertex(v) {
                // crossing edges are already gone, so only inner ones remain
                debug_assert!(induced.contains_edge(&dropped.id));
            }
        }
        for e in crossing.iter() {
            let rerouted = if selected.contains(&e.source) {
                Edge {
                    id: e.id,
                    source: cluster_vertex,
                    sink: e.sink,
                }
            } else {
                Edge {
                    id: e.id,
                    source: e.source,
                    sink: cluster_vertex,
                }
            };
            next.restore_edge(rerouted);
        }
        assert_eq!(
            next.edge_size() + induced.edge_size(),
            edges_before,
            "edge lost or duplicated during collapse"
        );

        let anchor = Point::centroid(selected.iter().filter_map(|v| layout.get(v)))
            .unwrap_or_default();
        layout.set(cluster_vertex, anchor);
        layout.lock(cluster_vertex, true);

        self.records.insert(
            cluster_vertex,
            ClusterRecord {
                cluster_vertex,
                members: selected.iter().copied().collect(),
                induced,
                rewired,
                anchor,
            },
        );
        self.graph = next;
        self.version = self.version.next();
        Some(cluster_vertex)
    }

    /// The exact inverse of the collapse that produced `cluster_vertex`.
    ///
    /// Members and induced edges come back under their original ID's,
    /// rewired edges get their recorded endpoints back, and the cluster
    /// vertex disappears from the graph and the layout store. Inner cluster
    /// vertices stay collapsed; expand again to descend.
    ///
    /// Without a record for `cluster_vertex` this is a no-op returning
    /// `false`. So is a cluster vertex currently wrapped inside an outer
    /// cluster: its record is live but the vertex is not in the top-level
    /// graph, and it only becomes expandable once the outer cluster is.
    pub fn expand(&mut self, layout: &mut LayoutStore, cluster_vertex: &VertexId) -> bool {
        let record = match self.records.get(cluster_vertex) {
            None => return false,
            Some(r) => r,
        };
        if !self.graph.contains_vertex(cluster_vertex) {
            return false;
        }

        let edges_before = self.graph.edge_size();
        let mut next = self.graph.clone();
        for eid in record.rewired.keys() {
            let removed = next.remove_edge(eid);
            debug_assert!(removed.is_some());
        }
        let dangling = next.remove_vertex(cluster_vertex).count();
        assert_eq!(
            dangling, 0,
            "cluster vertex carried edges its record does not know about"
        );
        for v in record.members.iter() {
            next.restore_vertex(*v);
        }
        for e in record.induced.iter_edges() {
            next.restore_edge(e);
        }
        for e in record.rewired.values() {
            next.restore_edge(e.clone());
        }
        assert_eq!(
            next.edge_size(),
            edges_before + record.induced.edge_size(),
            "edge lost or duplicated during expand"
        );

        // consume the record only once the rebuilt graph is good, so a
        // panicking invariant check above leaves the engine as it was
        self.records.remove(cluster_vertex);
        layout.remove(cluster_vertex);
        self.graph = next;
        self.version = self.version.next();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    fn four_cycle() -> (TreeBackedGraph, [VertexId; 4], [EdgeId; 4]) {
        let mut g = TreeBackedGraph::new();
        let a = g.add_vertex();
        let b = g.add_vertex();
        let c = g.add_vertex();
        let d = g.add_vertex();
        let ab = g.add_edge(a, b);
        let bc = g.add_edge(b, c);
        let cd = g.add_edge(c, d);
        let ad = g.add_edge(a, d);
        (g, [a, b, c, d], [ab, bc, cd, ad])
    }

    fn positioned(vertices: &[VertexId]) -> LayoutStore {
        let mut layout = LayoutStore::new();
        for (i, v) in vertices.iter().enumerate() {
            layout.set(*v, Point::new(i as f64, (i * i) as f64));
        }
        layout
    }

    /// Deterministic pseudo-random sub-selection of the vertex set.
    fn pick_selection(g: &TreeBackedGraph, seed: u64) -> BTreeSet<VertexId> {
        let mut state = seed | 1;
        g.iter_vertices()
            .filter(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (state >> 33) & 1 == 0
            })
            .collect()
    }

    #[test]
    fn four_cycle_scenario() {
        let (g, [a, b, c, d], [ab, bc, cd, ad]) = four_cycle();
        let original = g.clone();
        let mut layout = positioned(&[a, b, c, d]);
        let mut engine = ClusterEngine::new(g);

        let selected: BTreeSet<_> = [a, b].into_iter().collect();
        let x = engine.collapse(&mut layout, &selected).unwrap();

        let now = engine.graph();
        let vertices: BTreeSet<_> = now.iter_vertices().collect();
        assert_eq!(vertices, [c, d, x].into_iter().collect());
        assert_eq!(now.edge_size(), 3);
        assert_eq!(now.find_edge(&cd).unwrap(), Edge { id: cd, source: c, sink: d });
        // B-C became X-C, A-D became X-D, both under their old ID's
        assert_eq!(now.find_edge(&bc).unwrap(), Edge { id: bc, source: x, sink: c });
        assert_eq!(now.find_edge(&ad).unwrap(), Edge { id: ad, source: x, sink: d });
        assert!(!now.contains_edge(&ab));

        let record = engine.cluster_record(&x).unwrap();
        let induced = record.induced_subgraph();
        assert_eq!(induced.vertex_size(), 2);
        assert_eq!(induced.edge_size(), 1);
        assert_eq!(induced.find_edge(&ab).unwrap(), Edge { id: ab, source: a, sink: b });

        assert!(engine.expand(&mut layout, &x));
        assert!(same_graph(engine.graph(), &original));
        assert!(!engine.is_cluster(&x));
        assert_eq!(layout.get(&x), None);
    }

    #[test]
    fn collapse_noop_guards() {
        let (g, [a, _, _, _], _) = four_cycle();
        let mut layout = LayoutStore::new();
        let mut engine = ClusterEngine::new(g.clone());

        let single: BTreeSet<_> = [a].into_iter().collect();
        assert_eq!(engine.collapse(&mut layout, &single), None);

        let unknown: BTreeSet<_> = [a, VertexId::new(999)].into_iter().collect();
        assert_eq!(engine.collapse(&mut layout, &unknown), None);

        assert!(same_graph(engine.graph(), &g));
        assert_eq!(engine.version(), GraphVersion(0));
    }

    #[test]
    fn expand_noop_guard() {
        let (g, _, _) = four_cycle();
        let mut layout = LayoutStore::new();
        let mut engine = ClusterEngine::new(g.clone());
        assert!(!engine.expand(&mut layout, &VertexId::new(999)));
        assert!(same_graph(engine.graph(), &g));
        assert_eq!(engine.version(), GraphVersion(0));
    }

    #[test]
    fn centroid_and_lock_after_collapse() {
        let (g, [a, b, _, _], _) = four_cycle();
        let mut layout = LayoutStore::new();
        layout.set(a, Point::new(2.0, 6.0));
        layout.set(b, Point::new(4.0, -2.0));
        let mut engine = ClusterEngine::new(g);

        let selected: BTreeSet<_> = [a, b].into_iter().collect();
        let x = engine.collapse(&mut layout, &selected).unwrap();

        let p = layout.get(&x).unwrap();
        assert!((p.x - 3.0).abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
        assert!(layout.is_locked(&x));
        assert!(!layout.nudge(x, Point::new(0.0, 0.0)));
        assert_eq!(layout.get(&x), Some(p));

        // member entries survive for the eventual expand
        assert_eq!(layout.get(&a), Some(Point::new(2.0, 6.0)));
        assert_eq!(layout.get(&b), Some(Point::new(4.0, -2.0)));

        layout.lock(x, false);
        assert!(layout.nudge(x, Point::new(0.0, 0.0)));
    }

    #[test]
    fn collapsing_adjacent_vertices_keeps_their_edges_inside() {
        let mut g = TreeBackedGraph::new();
        let a = g.add_vertex();
        let b = g.add_vertex();
        let c = g.add_vertex();
        let ab0 = g.add_edge(a, b);
        let ab1 = g.add_edge(a, b);
        let aa = g.add_edge(a, a);
        let bc = g.add_edge(b, c);
        let original = g.clone();

        let mut layout = positioned(&[a, b, c]);
        let mut engine = ClusterEngine::new(g);
        let selected: BTreeSet<_> = [a, b].into_iter().collect();
        let x = engine.collapse(&mut layout, &selected).unwrap();

        // parallels and the self-loop all live inside the cluster now
        let induced = engine.cluster_record(&x).unwrap().induced_subgraph();
        assert_eq!(induced.edge_size(), 3);
        assert!(induced.contains_edge(&ab0));
        assert!(induced.contains_edge(&ab1));
        assert!(induced.contains_edge(&aa));
        assert_eq!(engine.graph().edge_size(), 1);
        assert_eq!(engine.graph().find_edge(&bc).unwrap().source, x);

        assert!(engine.expand(&mut layout, &x));
        assert!(same_graph(engine.graph(), &original));
    }

    #[test]
    fn nesting_expands_one_level_at_a_time() {
        let mut g = TreeBackedGraph::new();
        let a = g.add_vertex();
        let b = g.add_vertex();
        let c = g.add_vertex();
        let _bc = g.add_edge(b, c);
        let _ab = g.add_edge(a, b);
        let original = g.clone();

        let mut layout = positioned(&[a, b, c]);
        let mut engine = ClusterEngine::new(g);

        let x1 = engine
            .collapse(&mut layout, &[b, c].into_iter().collect())
            .unwrap();
        let x2 = engine
            .collapse(&mut layout, &[a, x1].into_iter().collect())
            .unwrap();

        let members: BTreeSet<_> = engine.members_of(&x2).unwrap().iter().copied().collect();
        assert_eq!(members, [a, x1].into_iter().collect());
        let induced = engine.cluster_record(&x2).unwrap().induced_subgraph();
        assert!(induced.contains_vertex(&x1));
        assert!(!induced.contains_vertex(&b));
        assert!(!induced.contains_vertex(&c));

        assert!(engine.expand(&mut layout, &x2));
        let vertices: BTreeSet<_> = engine.graph().iter_vertices().collect();
        assert_eq!(vertices, [a, x1].into_iter().collect());
        assert!(engine.is_cluster(&x1));

        assert!(engine.expand(&mut layout, &x1));
        assert!(same_graph(engine.graph(), &original));
    }

    #[test]
    fn expanding_a_wrapped_cluster_is_a_noop_until_its_outer_expands() {
        let mut g = TreeBackedGraph::new();
        let a = g.add_vertex();
        let b = g.add_vertex();
        let c = g.add_vertex();
        let _ab = g.add_edge(a, b);
        let _bc = g.add_edge(b, c);
        let original = g.clone();

        let mut layout = positioned(&[a, b, c]);
        let mut engine = ClusterEngine::new(g);
        let x1 = engine
            .collapse(&mut layout, &[a, b].into_iter().collect())
            .unwrap();
        let x2 = engine
            .collapse(&mut layout, &[x1, c].into_iter().collect())
            .unwrap();
        let snapshot = engine.graph().clone();
        let version = engine.version();

        // x1 has a live record but sits inside x2's induced subgraph now
        assert!(!engine.expand(&mut layout, &x1));
        assert!(same_graph(engine.graph(), &snapshot));
        assert_eq!(engine.version(), version);
        assert!(engine.is_cluster(&x1));

        // the record survived, so the normal outer-then-inner order still works
        assert!(engine.expand(&mut layout, &x2));
        assert!(engine.expand(&mut layout, &x1));
        assert!(same_graph(engine.graph(), &original));
    }

    #[test]
    fn version_counts_successful_operations_only() {
        let (g, [a, b, _, _], _) = four_cycle();
        let mut layout = positioned(&[a, b]);
        let mut engine = ClusterEngine::new(g);
        assert_eq!(engine.version(), GraphVersion(0));

        let _ = engine.collapse(&mut layout, &[a].into_iter().collect());
        assert_eq!(engine.version(), GraphVersion(0));

        let x = engine
            .collapse(&mut layout, &[a, b].into_iter().collect())
            .unwrap();
        assert_eq!(engine.version(), GraphVersion(1));
        assert!(engine.expand(&mut layout, &x));
        assert_eq!(engine.version(), GraphVersion(2));
    }

    #[quickcheck]
    fn edge_conservation(ops: Ops, seed: u64) -> TestResult {
        let g: TreeBackedGraph = apply_ops(&ops);
        let selected = pick_selection(&g, seed);
        if selected.len() < 2 {
            return TestResult::discard();
        }
        let vertices: Vec<_> = g.iter_vertices().collect();
        let mut layout = positioned(&vertices);
        let edges_total = g.edge_size();

        let mut engine = ClusterEngine::new(g);
        let x = engine.collapse(&mut layout, &selected).unwrap();
        let induced_edges = engine
            .cluster_record(&x)
            .unwrap()
            .induced_subgraph()
            .edge_size();
        TestResult::from_bool(engine.graph().edge_size() + induced_edges == edges_total)
    }

    #[quickcheck]
    fn collapse_expand_round_trip(ops: Ops, seed: u64) -> TestResult {
        let g: TreeBackedGraph = apply_ops(&ops);
        let selected = pick_selection(&g, seed);
        if selected.len() < 2 {
            return TestResult::discard();
        }
        let original = g.clone();
        let vertices: Vec<_> = g.iter_vertices().collect();
        let mut layout = positioned(&vertices);

        let mut engine = ClusterEngine::new(g);
        let x = engine.collapse(&mut layout, &selected).unwrap();
        assert!(engine.expand(&mut layout, &x));
        TestResult::from_bool(same_graph(engine.graph(), &original) && layout.get(&x).is_none())
    }

    #[quickcheck]
    fn round_trip_on_petgraph_backend(ops: Ops, seed: u64) -> TestResult {
        let tree: TreeBackedGraph = apply_ops(&ops);
        let selected = pick_selection(&tree, seed);
        if selected.len() < 2 {
            return TestResult::discard();
        }
        let g: PetgraphBackedGraph = apply_ops(&ops);
        let vertices: Vec<_> = tree.iter_vertices().collect();
        let mut layout = positioned(&vertices);

        let mut engine = ClusterEngine::new(g);
        let x = engine.collapse(&mut layout, &selected).unwrap();
        assert!(engine.expand(&mut layout, &x));
        TestResult::from_bool(same_graph(engine.graph(), &tree))
    }
}
