//! This is a library to recognize [interval graphs](https://en.wikipedia.org/wiki/Interval_graph)
//! and to build interval models and nice tree decompositions for them.
//!
//! A graph is an *interval graph* if its vertices can be assigned closed intervals on the line
//! such that two vertices are adjacent exactly if their intervals intersect.
//!
//! # Examples
//!
//! Recognizing an interval graph and querying its intervals.
//! ```rust
//! # use std::error::Error;
//! #
//! # fn main() -> Result<(), Box<dyn Error>> {
//! use petgraph::graph::UnGraph;
//! use interval_graph::{recognize, Interval};
//!
//! // a triangle with a pendant vertex
//! let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 0), (2, 3)]);
//! let representation = recognize(&graph).into_representation()?;
//!
//! let query = Interval::point(3);
//! assert!(!representation.vertices_overlapping(&query).is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! Graphs with an asteroidal triple are not interval graphs, even if they are chordal.
//! ```rust
//! use petgraph::graph::UnGraph;
//! use interval_graph::{chordality, recognize};
//!
//! // a claw with subdivided edges
//! let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (0, 3), (3, 4), (0, 5), (5, 6)]);
//! assert!(chordality(&graph).is_chordal());
//!
//! let recognition = recognize(&graph);
//! assert!(!recognition.is_interval_graph());
//! assert!(recognition.umbrella().is_some());
//! ```
//!
//! # Generics
//!
//! The algorithms are implemented for structs that implement the `petgraph`
//! traits `NodeCompactIndexable`, `IntoNeighbors`, and `GraphProp<EdgeType =
//! Undirected>`.
//!
//! # References
//! + \[COS09\]: Derek G. Corneil, Stephan Olariu, and Lorna Stewart. “The LBFS Structure and
//!   Recognition of Interval Graphs”. <https://doi.org/10.1137/S0895480100373455>.
//! + \[KM89\]: Norbert Korte and Rolf H. Möhring. “An Incremental Linear-Time Algorithm for
//!   Recognizing Interval Graphs”. <https://doi.org/10.1137/0218005>.
//! + \[RTL76\]: Donald J. Rose, R. Endre Tarjan, and George S. Lueker. “Algorithmic Aspects of
//!   Vertex Elimination on Graphs”. <https://doi.org/10.1137/0205021>.

#![forbid(unsafe_code)]
#![doc(test(attr(deny(warnings, rust_2018_idioms), allow(dead_code))))]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms, unreachable_pub)]

mod chordal;
/// Nice tree and path decompositions of chordal and interval graphs.
pub mod decomposition;
mod index;
mod interval;
mod interval_tree;
/// Lexicographic breadth-first search sweeps.
pub mod lbfs;
/// Recognition with modified PQ-trees.
pub mod mpq;
mod ordering;
mod recognizer;

#[cfg(test)]
mod tests;

pub use chordal::{chordality, Chordality};
pub use interval::{Interval, IntervalError};
pub use interval_tree::{IntervalTree, Iter as IntervalTreeIter};
pub use ordering::{OrderError, VertexOrder};
pub use recognizer::{recognize, IntervalRepresentation, Recognition, RecognitionError, Umbrella};
