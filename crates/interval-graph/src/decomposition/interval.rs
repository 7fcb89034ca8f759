//! Nice path decompositions of interval graphs.

use std::hash::Hash;

use petgraph::visit::{GraphProp, IntoNeighbors, NodeCompactIndexable};
use petgraph::Undirected;
use tracing::{debug, info, instrument};

use super::{Bag, DecompositionBuilder, DecompositionError, NiceDecomposition, Terminal};
use crate::interval::Interval;
use crate::recognizer::recognize;

/// Computes a nice path decomposition of an interval graph from the interval model found by
/// [recognize](crate::recognize).
///
/// Returns [DecompositionError::NotIntervalGraph] for graphs that are not interval graphs.
///
/// ```rust
/// # use std::error::Error;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use petgraph::graph::UnGraph;
/// use interval_graph::decomposition::interval::interval_nice_path_decomposition;
///
/// let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (1, 3), (3, 4)]);
/// let decomposition = interval_nice_path_decomposition(&graph)?;
///
/// assert!(decomposition.is_nice());
/// assert!(decomposition.is_tree_decomposition_of(&graph));
/// assert_eq!(decomposition.width(), 1);
/// # Ok(())
/// # }
/// ```
#[instrument(skip_all)]
pub fn interval_nice_path_decomposition<G>(graph: G) -> Result<NiceDecomposition<G::NodeId>, DecompositionError>
where
    G: NodeCompactIndexable + IntoNeighbors + GraphProp<EdgeType = Undirected>,
    G::NodeId: Hash + Ord,
{
    let representation = recognize(graph).into_representation().map_err(|_| DecompositionError::NotIntervalGraph)?;
    nice_path_decomposition_from_intervals(representation.iter())
}

/// Computes a nice path decomposition from closed intervals. Two vertices share a bag exactly if
/// their intervals intersect.
///
/// The root bag holds the vertex whose interval starts first. Walking the intervals by start, the
/// vertices whose intervals ended before the next start are forgotten and then the next vertex is
/// introduced. The bottom of the path keeps a single vertex.
#[instrument(skip_all)]
pub fn nice_path_decomposition_from_intervals<V, T>(
    intervals: impl IntoIterator<Item = (V, Interval<T>)>,
) -> Result<NiceDecomposition<V>, DecompositionError>
where
    V: Copy + Ord,
    T: Ord + Copy,
{
    let mut by_start: Vec<(V, Interval<T>)> = intervals.into_iter().collect();
    by_start.sort_by(|(u, a), (v, b)| Interval::cmp_by_start(a, b).then(u.cmp(v)));
    let mut by_end = by_start.clone();
    by_end.sort_by(|(u, a), (v, b)| Interval::cmp_by_end(a, b).then(u.cmp(v)));

    let Some(&(first, _)) = by_start.first() else {
        return Ok(DecompositionBuilder::new(Bag::new()).finish());
    };
    let mut builder = DecompositionBuilder::new(Bag::from([first]));
    let mut current = builder.root();
    let mut ended = by_end.iter().peekable();

    for &(v, interval) in &by_start[1..] {
        while let Some(&(w, _)) = ended.next_if(|(_, other)| other.end() < interval.start()) {
            current = builder.add_forget(w, current)?;
        }
        current = builder.add_introduce(v, current)?;
    }

    builder.leaf_closure(Terminal::Singleton);
    let decomposition = builder.finish();
    debug!(width = decomposition.width());
    info!(number_of_bags = decomposition.node_count());
    Ok(decomposition)
}
