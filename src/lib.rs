//! Vertex clustering for interactive graph views.
//!
//! The central operation is *collapse*: a selected set of vertices is replaced
//! by one synthetic cluster vertex that wraps their induced subgraph. The
//! cluster vertex is dropped into a shared layout coordinate store at the
//! centroid of the members and locked there, so a layout algorithm running
//! between operations does not carry it away before the caller re-seeds the
//! relaxation. *Expand* reverses the whole thing without losing or duplicating
//! a single edge.
//!
//! The pieces:
//!
//! * [`graph`] — multigraph contracts and two interchangeable backends.
//!   Vertices and edges are lightweight ID's, essentially `usize`, so they can
//!   be copied and stored freely by callers.
//! * [`cluster`] — the collapse/expand engine and its cluster records.
//! * [`layout`] — positions keyed by vertex, with per-vertex and bulk locks.
//! * [`parallel`] — stable rendering ranks for parallel edges, with an
//!   exclusion set for pairs drawn as a single compressed line.
//!
//! Layout algorithms and rendering are collaborators, not residents: the crate
//! only fixes the contracts they must honor ([`layout::Relaxer`] and the lock
//! flag; [`parallel::ParallelEdgeIndex::reset`] after every topology change).

pub mod cluster;
pub mod graph;
pub mod layout;
pub mod parallel;
