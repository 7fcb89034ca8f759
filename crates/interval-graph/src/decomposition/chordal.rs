//! Nice tree decompositions of chordal graphs whose bags are cliques.

use petgraph::visit::{GraphProp, IntoNeighbors, NodeCompactIndexable};
use petgraph::Undirected;
use tracing::{debug, info, instrument};

use super::{Bag, BagIndex, DecompositionBuilder, DecompositionError, NiceDecomposition, Terminal};
use crate::chordal::earlier_neighbors_not_a_clique;
use crate::lbfs::lbfs;
use crate::ordering::VertexOrder;

/// Computes a nice tree decomposition of a chordal graph. Every bag is a clique, so the width is
/// the clique number minus one. The root and all leaves have empty bags.
///
/// Returns [DecompositionError::NotChordal] for graphs that are not chordal.
///
/// ```rust
/// # use std::error::Error;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use petgraph::graph::UnGraph;
/// use interval_graph::decomposition::chordal::chordal_nice_decomposition;
///
/// // two triangles sharing the edge 1-2
/// let graph = UnGraph::<(), ()>::from_edges([(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);
/// let decomposition = chordal_nice_decomposition(&graph)?;
///
/// assert!(decomposition.is_nice());
/// assert!(decomposition.is_tree_decomposition_of(&graph));
/// assert_eq!(decomposition.width(), 2);
/// # Ok(())
/// # }
/// ```
#[instrument(skip_all)]
pub fn chordal_nice_decomposition<G>(graph: G) -> Result<NiceDecomposition<G::NodeId>, DecompositionError>
where
    G: NodeCompactIndexable + IntoNeighbors + GraphProp<EdgeType = Undirected>,
    G::NodeId: Ord,
{
    let order = lbfs(graph);
    if earlier_neighbors_not_a_clique(graph, &order).is_some() {
        info!(is_chordal = false);
        return Err(DecompositionError::NotChordal);
    }
    build(graph, &order)
}

/// Computes a nice tree decomposition from a perfect elimination order, in which the later
/// neighbors of every vertex form a clique.
///
/// Returns [DecompositionError::InvalidOrder] if `order` does not list every vertex exactly once
/// and [DecompositionError::NotChordal] if it is not a perfect elimination order.
#[instrument(skip_all)]
pub fn nice_decomposition_from_elimination_order<G>(
    graph: G,
    order: &[G::NodeId],
) -> Result<NiceDecomposition<G::NodeId>, DecompositionError>
where
    G: NodeCompactIndexable + IntoNeighbors + GraphProp<EdgeType = Undirected>,
    G::NodeId: Ord,
{
    let walk = order.iter().rev().map(|&v| graph.to_index(v)).collect();
    let walk = VertexOrder::with_vertex_count(walk, graph.node_bound())?;
    if earlier_neighbors_not_a_clique(graph, &walk).is_some() {
        return Err(DecompositionError::NotChordal);
    }
    build(graph, &walk)
}

/// Walks `walk`, in which the earlier neighbors of every vertex form a clique. Every vertex is
/// introduced below the node of its latest earlier neighbor, branching with a join whenever that
/// node is already in use.
fn build<G>(graph: G, walk: &VertexOrder) -> Result<NiceDecomposition<G::NodeId>, DecompositionError>
where
    G: NodeCompactIndexable + IntoNeighbors,
    G::NodeId: Ord,
{
    let mut builder = DecompositionBuilder::new(Bag::new());
    let mut current = builder.root();
    let mut node_of: Vec<Option<BagIndex>> = vec![None; walk.len()];

    for v in walk.iter() {
        let predecessors: Vec<usize> = graph
            .neighbors(graph.from_index(v))
            .map(|w| graph.to_index(w))
            .filter(|&w| walk.rank(w) < walk.rank(v))
            .collect();
        if let Some(&last) = predecessors.iter().max_by_key(|&&w| walk.rank(w)) {
            current = node_of[last].expect("earlier vertices have been placed");
        }
        if !builder.is_leaf(current) {
            current = builder.add_join(current)?.0;
        }

        let mut clique: Bag<G::NodeId> = predecessors.iter().map(|&w| graph.from_index(w)).collect();
        clique.insert(graph.from_index(v));
        let bag = builder.bag(current).ok_or(DecompositionError::UnknownNode(current))?;
        let outside: Vec<G::NodeId> = bag.difference(&clique).copied().collect();
        for w in outside {
            current = builder.add_forget(w, current)?;
        }
        current = builder.add_introduce(graph.from_index(v), current)?;
        node_of[v] = Some(current);
    }

    builder.leaf_closure(Terminal::Empty);
    let decomposition = builder.finish();
    debug!(width = decomposition.width());
    info!(number_of_bags = decomposition.node_count());
    Ok(decomposition)
}

#[cfg(test)]
mod test {
    use petgraph::graph::NodeIndex;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::chordal::chordality;
    use crate::decomposition::NodeKind;
    use crate::tests::*;

    #[test]
    fn empty_graph_has_a_single_empty_bag() {
        let graph = empty_graph(0);
        let decomposition = chordal_nice_decomposition(&graph).unwrap();
        assert_eq!(decomposition.node_count(), 1);
        assert!(decomposition.bag(decomposition.root()).unwrap().is_empty());
        assert!(decomposition.is_tree_decomposition_of(&graph));
    }

    #[test]
    fn cycles_are_rejected() {
        let graph = cycle_graph(5);
        assert_eq!(chordal_nice_decomposition(&graph).err(), Some(DecompositionError::NotChordal));
    }

    #[test]
    fn complete_graph_is_a_path() {
        let graph = complete_graph(4);
        let decomposition = chordal_nice_decomposition(&graph).unwrap();
        assert!(decomposition.is_nice());
        assert!(decomposition.is_tree_decomposition_of(&graph));
        assert_eq!(decomposition.width(), 3);
        // 4 introduce steps, 4 forget steps and the root
        assert_eq!(decomposition.node_count(), 9);
    }

    #[test]
    fn root_and_leaves_are_empty() {
        for graph in [star_graph(4), sun_3(), subdivided_claw(), disjoint_cliques(&[2, 3, 1])] {
            let decomposition = chordal_nice_decomposition(&graph).unwrap();
            assert!(decomposition.bag(decomposition.root()).unwrap().is_empty());
            for node in decomposition.tree().node_indices().map(BagIndex) {
                if decomposition.node_kind(node) == Some(NodeKind::Leaf) {
                    assert!(decomposition.bag(node).unwrap().is_empty());
                }
            }
            assert!(decomposition.is_nice());
            assert!(decomposition.is_tree_decomposition_of(&graph));
        }
    }

    #[test]
    fn width_is_clique_number_minus_one() {
        assert_eq!(chordal_nice_decomposition(&path_graph(7)).unwrap().width(), 1);
        assert_eq!(chordal_nice_decomposition(&star_graph(5)).unwrap().width(), 1);
        assert_eq!(chordal_nice_decomposition(&sun_3()).unwrap().width(), 2);
        assert_eq!(chordal_nice_decomposition(&disjoint_cliques(&[2, 5])).unwrap().width(), 4);
    }

    #[test]
    fn explicit_elimination_order() {
        let graph = path_graph(4);
        let order: Vec<NodeIndex> = [0, 3, 1, 2].into_iter().map(NodeIndex::new).collect();
        let decomposition = nice_decomposition_from_elimination_order(&graph, &order).unwrap();
        assert!(decomposition.is_nice());
        assert!(decomposition.is_tree_decomposition_of(&graph));

        let not_perfect: Vec<NodeIndex> = [1, 0, 2, 3].into_iter().map(NodeIndex::new).collect();
        assert_eq!(
            nice_decomposition_from_elimination_order(&graph, &not_perfect).err(),
            Some(DecompositionError::NotChordal)
        );

        let short: Vec<NodeIndex> = [0, 1].into_iter().map(NodeIndex::new).collect();
        assert!(matches!(
            nice_decomposition_from_elimination_order(&graph, &short),
            Err(DecompositionError::InvalidOrder(_))
        ));
    }

    #[test]
    fn random_chordal_graphs() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut checked = 0;
        for i in 0..300 {
            let graph = random_graph(4 + i % 9, 0.5, &mut rng);
            if !chordality(&graph).is_chordal() {
                assert!(chordal_nice_decomposition(&graph).is_err());
                continue;
            }
            let decomposition = chordal_nice_decomposition(&graph).unwrap();
            assert!(decomposition.is_nice());
            assert!(decomposition.is_tree_decomposition_of(&graph));
            for bag in decomposition.tree().node_weights() {
                let bag: Vec<_> = bag.iter().copied().collect();
                for (j, &a) in bag.iter().enumerate() {
                    for &b in &bag[j + 1..] {
                        assert!(graph.contains_edge(a, b));
                    }
                }
            }
            checked += 1;
        }
        assert!(checked > 10);
    }
}
