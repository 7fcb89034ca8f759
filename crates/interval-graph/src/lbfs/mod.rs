//! Lexicographic breadth-first search with configurable tie-breaking.
//!
//! All three sweeps share one engine. The unvisited vertices are kept in a [BucketList] ordered
//! by their lexicographic label. Visiting a vertex splits every bucket into the neighbors of that
//! vertex, which move in front, and the rest. Ties inside the head bucket are broken by one or
//! two priority orders. The adjacency lists are sorted by each priority once, so every sweep takes
//! O(n + m) time.
//!
//! Vertices are identified by their compact index, see
//! [NodeCompactIndexable](petgraph::visit::NodeCompactIndexable).

mod bucket;

use petgraph::visit::{GraphProp, IntoNeighbors, NodeCompactIndexable};
use petgraph::Undirected;
use tracing::{debug, instrument};

use crate::ordering::VertexOrder;
use bucket::{BucketList, MAX_ORDERS};

/// Plain LBFS. The initial bucket is in index order, so the sweep starts at index `0` and breaks
/// all ties towards smaller indices.
///
/// ```rust
/// use petgraph::graph::UnGraph;
/// use interval_graph::lbfs::lbfs;
///
/// let graph = UnGraph::<(), ()>::from_edges([(0, 3), (1, 2), (2, 3)]);
/// assert_eq!(lbfs(&graph).as_slice(), [0, 3, 2, 1]);
/// ```
#[instrument(skip_all)]
pub fn lbfs<G>(graph: G) -> VertexOrder
where
    G: NodeCompactIndexable + IntoNeighbors + GraphProp<EdgeType = Undirected>,
{
    let n = graph.node_bound();
    let sequence: Vec<usize> = (0..n).collect();
    let order = Sweep::new(graph, [sequence]).run(|buckets| buckets.head_candidate(0));
    debug!(start = order.first(), end = order.last());
    order
}

/// LBFS+. Every tie is broken towards the vertex that comes last in `priority`, including the
/// choice of the start vertex.
///
/// Panics if `priority` is not an order over the vertices of `graph`.
#[instrument(skip_all)]
pub fn lbfs_plus<G>(graph: G, priority: &VertexOrder) -> VertexOrder
where
    G: NodeCompactIndexable + IntoNeighbors + GraphProp<EdgeType = Undirected>,
{
    assert_eq!(priority.len(), graph.node_bound());
    let sequence: Vec<usize> = priority.iter().rev().collect();
    let order = Sweep::new(graph, [sequence]).run(|buckets| buckets.head_candidate(0));
    debug!(start = order.first(), end = order.last());
    order
}

/// LBFS*. The head bucket is viewed through both orders, `α` is its last vertex in `a` and `β` is
/// its last vertex in `b`. The choice between the two follows the rules of Corneil, Olariu and
/// Stewart:
///
/// 1. `α` has a neighbor after it in `a`: take `β`.
/// 2. Otherwise, `β` has a neighbor after it in `b`: take `α`.
/// 3. Otherwise, `β` is the furthest neighbor of no vertex in `b` or `α` is the furthest neighbor
///    of some vertex in `a`: take `β`.
/// 4. Otherwise, if the furthest neighbor in `a` of the representative of `β`'s set is `α`: take
///    `β`.
/// 5. Otherwise, take `α`.
///
/// The set of a vertex `x` under an order consists of the other vertices whose furthest neighbor
/// in that order is `x`. Its representative is the member that comes first in `b`.
///
/// Panics if `a` or `b` are not orders over the vertices of `graph`.
#[instrument(skip_all)]
pub fn lbfs_star<G>(graph: G, a: &VertexOrder, b: &VertexOrder) -> VertexOrder
where
    G: NodeCompactIndexable + IntoNeighbors + GraphProp<EdgeType = Undirected>,
{
    let n = graph.node_bound();
    assert_eq!(a.len(), n);
    assert_eq!(b.len(), n);

    let rules = TieBreak::new(graph, a, b);
    let sequences = [a.iter().rev().collect(), b.iter().rev().collect()];
    let order = Sweep::new(graph, sequences).run(|buckets| {
        let alpha = buckets.head_candidate(0)?;
        let beta = buckets.head_candidate(1)?;
        Some(rules.choose(alpha, beta))
    });
    debug!(start = order.first(), end = order.last());
    order
}

/// The largest rank in `order` over the closed neighborhood of every vertex, indexed by vertex.
pub(crate) fn neighbor_index<G>(graph: G, order: &VertexOrder) -> Vec<usize>
where
    G: NodeCompactIndexable + IntoNeighbors,
{
    (0..graph.node_bound())
        .map(|v| {
            graph
                .neighbors(graph.from_index(v))
                .map(|w| order.rank(graph.to_index(w)))
                .fold(order.rank(v), usize::max)
        })
        .collect()
}

struct Sweep {
    /// `adjacency[k][v]` are the neighbors of `v`, best first under the `k`-th order.
    adjacency: Vec<Vec<Vec<usize>>>,
    buckets: BucketList,
}

impl Sweep {
    /// `sequences[k]` lists all vertices, best first, for the `k`-th order.
    fn new<G, const K: usize>(graph: G, sequences: [Vec<usize>; K]) -> Self
    where
        G: NodeCompactIndexable + IntoNeighbors,
    {
        let n = graph.node_bound();
        let adjacency = sequences.iter().map(|sequence| sorted_adjacency(graph, sequence)).collect();
        let slices: Vec<&[usize]> = sequences.iter().map(|sequence| sequence.as_slice()).collect();
        let buckets = BucketList::new(n, &slices);
        Self { adjacency, buckets }
    }

    fn run(mut self, mut select: impl FnMut(&BucketList) -> Option<usize>) -> VertexOrder {
        let orders = self.adjacency.len();
        let mut order = Vec::with_capacity(self.adjacency.first().map_or(0, Vec::len));
        while let Some(v) = select(&self.buckets) {
            self.buckets.visit(v);
            order.push(v);

            let mut neighbors: [&[usize]; MAX_ORDERS] = [&[]; MAX_ORDERS];
            for (k, adjacency) in self.adjacency.iter().enumerate() {
                neighbors[k] = &adjacency[v];
            }
            self.buckets.refine(&neighbors[..orders]);
        }
        VertexOrder::from_permutation(order)
    }
}

/// Adjacency lists sorted by position in `sequence`, in O(n + m). Self loops and parallel edges
/// are dropped.
fn sorted_adjacency<G>(graph: G, sequence: &[usize]) -> Vec<Vec<usize>>
where
    G: NodeCompactIndexable + IntoNeighbors,
{
    let mut adjacency = vec![vec![]; graph.node_bound()];
    for &u in sequence {
        for w in graph.neighbors(graph.from_index(u)) {
            let w = graph.to_index(w);
            let list: &mut Vec<usize> = &mut adjacency[w];
            if w != u && list.last() != Some(&u) {
                list.push(u);
            }
        }
    }
    adjacency
}

/// Data derived from the two orders of an LBFS* sweep.
struct TieBreak {
    rank_a: Vec<usize>,
    rank_b: Vec<usize>,
    neighbor_index_a: Vec<usize>,
    neighbor_index_b: Vec<usize>,
    /// Whether some other vertex has its furthest `a`-neighbor at the vertex.
    in_a_set: Vec<bool>,
    /// The member with the smallest `b`-rank among the vertices whose furthest `b`-neighbor is the vertex.
    b_representative: Vec<Option<usize>>,
}

impl TieBreak {
    fn new<G>(graph: G, a: &VertexOrder, b: &VertexOrder) -> Self
    where
        G: NodeCompactIndexable + IntoNeighbors,
    {
        let n = graph.node_bound();
        let rank_a: Vec<usize> = (0..n).map(|v| a.rank(v)).collect();
        let rank_b: Vec<usize> = (0..n).map(|v| b.rank(v)).collect();
        let neighbor_index_a = neighbor_index(graph, a);
        let neighbor_index_b = neighbor_index(graph, b);
        let in_a_set = furthest_neighbor_sets(a, &neighbor_index_a)
            .iter()
            .map(|set| !set.is_empty())
            .collect();
        let b_representative = furthest_neighbor_sets(b, &neighbor_index_b)
            .iter()
            .map(|set| set.iter().copied().min_by_key(|&u| rank_b[u]))
            .collect();
        Self { rank_a, rank_b, neighbor_index_a, neighbor_index_b, in_a_set, b_representative }
    }

    fn choose(&self, alpha: usize, beta: usize) -> usize {
        if self.neighbor_index_a[alpha] > self.rank_a[alpha] {
            return beta;
        }
        if self.neighbor_index_b[beta] > self.rank_b[beta] {
            return alpha;
        }
        match self.b_representative[beta] {
            None => beta,
            Some(_) if self.in_a_set[alpha] => beta,
            Some(u) if self.neighbor_index_a[u] == self.rank_a[alpha] => beta,
            Some(_) => alpha,
        }
    }
}

/// For every vertex `x`, the other vertices whose furthest neighbor in `order` is `x`.
fn furthest_neighbor_sets(order: &VertexOrder, neighbor_index: &[usize]) -> Vec<Vec<usize>> {
    let mut sets = vec![vec![]; neighbor_index.len()];
    for (u, &index) in neighbor_index.iter().enumerate() {
        let x = order.element_at(index);
        if x != u {
            sets[x].push(u);
        }
    }
    sets
}

#[cfg(test)]
mod test {
    use petgraph::graph::{NodeIndex, UnGraph};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::tests::*;

    /// Checks the four point condition: for `a < b < c` with `ac` an edge and `ab` not an edge,
    /// there is a `d < a` adjacent to `b` but not to `c`.
    fn is_lbfs_order(graph: &UnGraph<(), ()>, order: &VertexOrder) -> bool {
        let n = order.len();
        let adjacent = |u: usize, v: usize| graph.contains_edge(NodeIndex::new(u), NodeIndex::new(v));
        for i in 0..n {
            for j in i + 1..n {
                for k in j + 1..n {
                    let (a, b, c) = (order.element_at(i), order.element_at(j), order.element_at(k));
                    if adjacent(a, c) && !adjacent(a, b) {
                        let witness = (0..i).map(|l| order.element_at(l)).any(|d| adjacent(d, b) && !adjacent(d, c));
                        if !witness {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    #[test]
    fn empty() {
        let graph = empty_graph(0);
        assert!(lbfs(&graph).is_empty());
        let order = VertexOrder::identity(0);
        assert!(lbfs_plus(&graph, &order).is_empty());
        assert!(lbfs_star(&graph, &order, &order).is_empty());
    }

    #[test]
    fn path_from_first_vertex() {
        let graph = path_graph(5);
        assert_eq!(lbfs(&graph).as_slice(), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn plus_starts_at_last_vertex_of_priority() {
        let graph = path_graph(5);
        let alpha = lbfs(&graph);
        let beta = lbfs_plus(&graph, &alpha);
        assert_eq!(beta.as_slice(), [4, 3, 2, 1, 0]);
    }

    #[test]
    fn plus_breaks_ties_by_priority() {
        let graph = star_graph(4);
        let priority = VertexOrder::from_sequence(vec![0, 3, 1, 4, 2]).unwrap();
        let order = lbfs_plus(&graph, &priority);
        assert_eq!(order.as_slice(), [2, 0, 4, 1, 3]);
    }

    #[test]
    fn disconnected_graph() {
        let graph = disjoint_cliques(&[2, 3]);
        let order = lbfs(&graph);
        assert_eq!(order.as_slice(), [0, 1, 2, 3, 4]);
        assert!(is_lbfs_order(&graph, &order));
    }

    #[test]
    fn neighbor_index_of_path() {
        let graph = path_graph(4);
        let order = VertexOrder::from_sequence(vec![1, 0, 2, 3]).unwrap();
        assert_eq!(neighbor_index(&graph, &order), [1, 2, 3, 3]);
    }

    #[test]
    fn furthest_neighbor_sets_of_path() {
        let graph = path_graph(4);
        let order = VertexOrder::identity(4);
        let index = neighbor_index(&graph, &order);
        let sets = furthest_neighbor_sets(&order, &index);
        assert_eq!(sets, [vec![], vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn tie_break_rules() {
        let graph = path_graph(4);
        let a = VertexOrder::from_sequence(vec![0, 2, 3, 1]).unwrap();
        let b = VertexOrder::from_sequence(vec![1, 3, 2, 0]).unwrap();
        let rules = TieBreak::new(&graph, &a, &b);
        // alpha reaches past itself in a
        assert_eq!(rules.choose(0, 1), 1);
        // beta reaches past itself in b
        assert_eq!(rules.choose(1, 3), 1);
        // alpha is the furthest a-neighbor of vertex 0
        assert_eq!(rules.choose(1, 0), 0);
        // the representative 3 of beta ends at alpha in a
        assert_eq!(rules.choose(3, 2), 2);
        // the representative 1 of beta ends beyond alpha in a
        assert_eq!(rules.choose(3, 0), 3);
    }

    #[test]
    fn all_sweeps_are_lbfs_orders() {
        let mut rng = StdRng::seed_from_u64(11);
        for i in 0..60 {
            let graph = random_graph(4 + i % 7, 0.4, &mut rng);
            let alpha = lbfs(&graph);
            assert!(is_lbfs_order(&graph, &alpha));
            let beta = lbfs_plus(&graph, &alpha);
            assert!(is_lbfs_order(&graph, &beta));
            let gamma = lbfs_plus(&graph, &beta);
            let star = lbfs_star(&graph, &beta, &gamma);
            assert!(is_lbfs_order(&graph, &star), "{:?}", star);
        }
    }
}
