use petgraph::visit::{GraphProp, IntoNeighbors, NodeCompactIndexable};
use petgraph::Undirected;
use tracing::{info, instrument};

use crate::lbfs::lbfs;
use crate::ordering::VertexOrder;

/// The result of [chordality].
#[derive(Clone, Debug)]
pub struct Chordality<V> {
    lbfs_order: Vec<V>,
    failing_vertex: Option<V>,
}

impl<V: Copy> Chordality<V> {
    /// Returns whether every cycle of length at least four has a chord.
    pub fn is_chordal(&self) -> bool {
        self.failing_vertex.is_none()
    }

    /// The LBFS order the test is based on. In it, the earlier neighbors of every vertex form a
    /// clique exactly if the graph is chordal.
    pub fn lbfs_order(&self) -> &[V] {
        &self.lbfs_order
    }

    /// The reversed LBFS order. For chordal graphs, the later neighbors of every vertex form a
    /// clique.
    pub fn perfect_elimination_order(&self) -> Option<Vec<V>> {
        self.is_chordal().then(|| self.lbfs_order.iter().rev().copied().collect())
    }

    /// The first vertex in LBFS order whose earlier neighbors do not form a clique.
    pub fn failing_vertex(&self) -> Option<V> {
        self.failing_vertex
    }
}

/// Tests whether `graph` is chordal.
///
/// A graph is chordal exactly if the reverse of any LBFS order is a perfect elimination order.
/// Runs in O(n + m) time.
///
/// ```rust
/// use petgraph::graph::UnGraph;
/// use interval_graph::chordality;
///
/// let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 0), (2, 3)]);
/// assert!(chordality(&graph).is_chordal());
///
/// let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 3), (3, 0)]);
/// assert!(!chordality(&graph).is_chordal());
/// ```
#[instrument(skip_all)]
pub fn chordality<G>(graph: G) -> Chordality<G::NodeId>
where
    G: NodeCompactIndexable + IntoNeighbors + GraphProp<EdgeType = Undirected>,
{
    let order = lbfs(graph);
    let failing_vertex = earlier_neighbors_not_a_clique(graph, &order);
    info!(number_of_nodes = order.len(), is_chordal = failing_vertex.is_none());
    Chordality {
        lbfs_order: order.iter().map(|v| graph.from_index(v)).collect(),
        failing_vertex: failing_vertex.map(|v| graph.from_index(v)),
    }
}

/// Returns the first vertex in `order` whose earlier neighbors do not form a clique.
///
/// The latest earlier neighbor `p` of `v` is its parent. The earlier neighbors form cliques for
/// all vertices exactly if the other earlier neighbors of every `v` are neighbors of its parent.
/// The checks are grouped by parent, so every adjacency list is scanned once.
pub(crate) fn earlier_neighbors_not_a_clique<G>(graph: G, order: &VertexOrder) -> Option<usize>
where
    G: NodeCompactIndexable + IntoNeighbors,
{
    let n = graph.node_bound();
    let mut requirements: Vec<Vec<(usize, usize)>> = vec![vec![]; n];
    let mut earlier = vec![];
    for v in order.iter() {
        earlier.clear();
        earlier.extend(
            graph.neighbors(graph.from_index(v)).map(|w| graph.to_index(w)).filter(|&w| order.rank(w) < order.rank(v)),
        );
        let Some(&parent) = earlier.iter().max_by_key(|&&w| order.rank(w)) else {
            continue;
        };
        for &w in earlier.iter() {
            if w != parent {
                requirements[parent].push((v, w));
            }
        }
    }

    let mut marked_by = vec![usize::MAX; n];
    let mut failing: Option<usize> = None;
    for parent in 0..n {
        if requirements[parent].is_empty() {
            continue;
        }
        for w in graph.neighbors(graph.from_index(parent)) {
            marked_by[graph.to_index(w)] = parent;
        }
        for &(v, w) in requirements[parent].iter() {
            if marked_by[w] != parent && failing.map_or(true, |f| order.rank(v) < order.rank(f)) {
                failing = Some(v);
            }
        }
    }
    failing
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::*;

    #[test]
    fn trees_and_cliques_are_chordal() {
        for graph in [empty_graph(0), empty_graph(3), path_graph(6), star_graph(4), complete_graph(5), subdivided_claw()] {
            let result = chordality(&graph);
            assert!(result.is_chordal());
            assert_eq!(result.failing_vertex(), None);
            assert_eq!(result.lbfs_order().len(), graph.node_count());
        }
    }

    #[test]
    fn cycles_are_not_chordal() {
        for n in 4..10 {
            let graph = cycle_graph(n);
            let result = chordality(&graph);
            assert!(!result.is_chordal());
            assert!(result.failing_vertex().is_some());
            assert!(result.perfect_elimination_order().is_none());
        }
        assert!(chordality(&cycle_graph(3)).is_chordal());
    }

    #[test]
    fn c4_fails_at_last_vertex() {
        let graph = cycle_graph(4);
        let result = chordality(&graph);
        let order: Vec<usize> = result.lbfs_order().iter().map(|v| v.index()).collect();
        assert_eq!(order, [0, 1, 3, 2]);
        assert_eq!(result.failing_vertex().map(|v| v.index()), Some(2));
    }

    #[test]
    fn later_neighbors_in_elimination_order_are_cliques() {
        let graph = sun_3();
        let result = chordality(&graph);
        let order = result.perfect_elimination_order().unwrap();
        for (i, &v) in order.iter().enumerate() {
            let later: Vec<_> = order[i + 1..].iter().copied().filter(|&w| graph.contains_edge(v, w)).collect();
            for (j, &a) in later.iter().enumerate() {
                for &b in &later[j + 1..] {
                    assert!(graph.contains_edge(a, b));
                }
            }
        }
    }
}
