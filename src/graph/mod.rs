//! Multigraph contracts and backends.
//!
//! Vertices and edges are lightweight ID's, essentially `usize`.
//! Callers may feel free to copy and store these ID's; the clustering engine
//! leans on that to keep edge identity stable while endpoints are rewritten.
//!
//! Two interchangeable backends are provided:
//!
//! * [TreeBackedGraph] — BTree-backed, deterministic insertion-order iteration.
//! * [PetgraphBackedGraph] — `petgraph` payload behind stable external ID's.
//!
//! Besides the usual grow/shrink/query traits there is [RestorableGraph],
//! insertion under caller-chosen ID's, which is what lets collapse/expand
//! round-trip a graph exactly.

mod vertex;
pub use self::vertex::*;
mod edge;
pub use self::edge::*;
mod r#trait;
pub use self::r#trait::*;
mod graph_debug;
pub use self::graph_debug::*;
mod tree_backed;
pub use self::tree_backed::*;
mod petgraph_backed;
pub use self::petgraph_backed::*;

#[cfg(test)]
pub use self::tests::*;
