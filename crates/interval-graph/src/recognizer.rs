use std::collections::HashMap;
use std::hash::Hash;

use petgraph::visit::{GraphProp, IntoNeighbors, NodeCompactIndexable};
use petgraph::Undirected;
use thiserror::Error;
use tracing::{info, instrument};

use crate::interval::Interval;
use crate::interval_tree::IntervalTree;
use crate::lbfs::{lbfs, lbfs_plus, lbfs_star, neighbor_index};
use crate::ordering::VertexOrder;

/// Errors when reading an interval representation from a [Recognition].
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
pub enum RecognitionError {
    /// The graph has no interval representation.
    #[error("graph is not an interval graph")]
    NotIntervalGraph,
}

/// Witness that the final sweep is not an interval ordering.
///
/// `missing` lies strictly between `vertex` and the furthest neighbor of `vertex` in the final
/// sweep, but is not adjacent to `vertex`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Umbrella<V> {
    /// The vertex whose neighborhood is not consecutive.
    pub vertex: V,
    /// The non-neighbor inside its range.
    pub missing: V,
}

/// The result of [recognize].
#[derive(Clone, Debug)]
pub struct Recognition<V> {
    sweep: Vec<V>,
    outcome: Result<IntervalRepresentation<V>, Umbrella<V>>,
}

impl<V: Copy> Recognition<V> {
    /// Returns whether the graph is an interval graph.
    pub fn is_interval_graph(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The final LBFS* sweep. The intervals are read off this order.
    pub fn sweep(&self) -> &[V] {
        &self.sweep
    }

    /// The witness for a negative result.
    pub fn umbrella(&self) -> Option<Umbrella<V>> {
        self.outcome.as_ref().err().copied()
    }

    /// The interval representation.
    pub fn representation(&self) -> Result<&IntervalRepresentation<V>, RecognitionError> {
        self.outcome.as_ref().map_err(|_| RecognitionError::NotIntervalGraph)
    }

    /// The interval representation, by value.
    pub fn into_representation(self) -> Result<IntervalRepresentation<V>, RecognitionError> {
        self.outcome.map_err(|_| RecognitionError::NotIntervalGraph)
    }

    /// The intervals of all vertices, sorted by start point.
    pub fn intervals_sorted_by_start(&self) -> Result<&[Interval<usize>], RecognitionError> {
        Ok(self.representation()?.intervals())
    }

    /// Maps every interval to its vertex.
    pub fn interval_to_vertex_map(&self) -> Result<&HashMap<Interval<usize>, V>, RecognitionError> {
        Ok(&self.representation()?.interval_to_vertex)
    }

    /// Maps every vertex to its interval.
    pub fn vertex_to_interval_map(&self) -> Result<&HashMap<V, Interval<usize>>, RecognitionError> {
        Ok(&self.representation()?.vertex_to_interval)
    }
}

/// One closed interval per vertex, such that two vertices are adjacent exactly if their intervals
/// intersect. End points are positions in the final sweep, so all intervals are distinct.
#[derive(Clone, Debug)]
pub struct IntervalRepresentation<V> {
    /// `(vertex, interval)` sorted by start point.
    sorted: Vec<(V, Interval<usize>)>,
    intervals: Vec<Interval<usize>>,
    interval_to_vertex: HashMap<Interval<usize>, V>,
    vertex_to_interval: HashMap<V, Interval<usize>>,
    tree: IntervalTree<usize>,
}

impl<V: Copy> IntervalRepresentation<V> {
    /// The intervals sorted by start point.
    pub fn intervals(&self) -> &[Interval<usize>] {
        &self.intervals
    }

    /// `(vertex, interval)` pairs sorted by the start point of the interval.
    pub fn iter(&self) -> impl Iterator<Item = (V, Interval<usize>)> + '_ {
        self.sorted.iter().copied()
    }

    /// Returns the number of vertices.
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Returns `true` for the representation of the empty graph.
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// The overlap index over all intervals.
    pub fn tree(&self) -> &IntervalTree<usize> {
        &self.tree
    }

    /// The vertices whose intervals intersect `query`, ordered by interval start.
    pub fn vertices_overlapping(&self, query: &Interval<usize>) -> Vec<V> {
        self.tree.overlapping(query).into_iter().map(|interval| self.interval_to_vertex[interval]).collect()
    }
}

impl<V: Copy + Hash + Eq> IntervalRepresentation<V> {
    /// The interval of `vertex`.
    pub fn interval_of(&self, vertex: V) -> Option<Interval<usize>> {
        self.vertex_to_interval.get(&vertex).copied()
    }
}

/// Decides whether `graph` is an interval graph with the six sweep algorithm of Corneil, Olariu
/// and Stewart.
///
/// The sweeps are `α = LBFS`, `β = LBFS+(α)`, `γ = LBFS+(β)`, `δ = LBFS+(γ)`, `ε = LBFS+(δ)` and
/// `ζ = LBFS*(δ, ε)`. The graph is an interval graph if for every vertex, the vertices between it
/// and its furthest neighbor in `ζ` are all adjacent to it. Each vertex then gets the interval
/// from its own position to the position of its furthest neighbor.
///
/// ```rust
/// # use std::error::Error;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use petgraph::graph::UnGraph;
/// use interval_graph::recognize;
///
/// // a path graph with 4 vertices
/// let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 3)]);
/// let recognition = recognize(&graph);
/// assert!(recognition.is_interval_graph());
///
/// let intervals = recognition.vertex_to_interval_map()?;
/// for edge in graph.edge_indices() {
///     let (u, v) = graph.edge_endpoints(edge).unwrap();
///     assert!(intervals[&u].intersects(&intervals[&v]));
/// }
///
/// // a cycle with 4 vertices is not even chordal
/// let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 3), (3, 0)]);
/// assert!(!recognize(&graph).is_interval_graph());
/// # Ok(())
/// # }
/// ```
#[instrument(skip_all)]
pub fn recognize<G>(graph: G) -> Recognition<G::NodeId>
where
    G: NodeCompactIndexable + IntoNeighbors + GraphProp<EdgeType = Undirected>,
    G::NodeId: Hash + Eq,
{
    let n = graph.node_bound();
    info!(number_of_nodes = n);

    let alpha = lbfs(graph);
    let beta = lbfs_plus(graph, &alpha);
    let gamma = lbfs_plus(graph, &beta);
    let delta = lbfs_plus(graph, &gamma);
    let epsilon = lbfs_plus(graph, &delta);
    let zeta = lbfs_star(graph, &delta, &epsilon);

    let neighbor_index = neighbor_index(graph, &zeta);
    let sweep: Vec<G::NodeId> = zeta.iter().map(|v| graph.from_index(v)).collect();

    if let Some((vertex, missing)) = find_umbrella(graph, &zeta, &neighbor_index) {
        info!(is_interval_graph = false, vertex, missing);
        let umbrella = Umbrella { vertex: graph.from_index(vertex), missing: graph.from_index(missing) };
        return Recognition { sweep, outcome: Err(umbrella) };
    }

    let sorted: Vec<(G::NodeId, Interval<usize>)> = zeta
        .iter()
        .map(|v| {
            let interval = Interval::new(zeta.rank(v), neighbor_index[v])
                .expect("the furthest neighbor of a vertex is never before the vertex");
            (graph.from_index(v), interval)
        })
        .collect();
    let intervals: Vec<Interval<usize>> = sorted.iter().map(|(_, interval)| *interval).collect();
    let interval_to_vertex = sorted.iter().map(|&(v, interval)| (interval, v)).collect();
    let vertex_to_interval = sorted.iter().copied().collect();
    let tree = intervals.iter().copied().collect();

    info!(is_interval_graph = true);
    let representation = IntervalRepresentation { sorted, intervals, interval_to_vertex, vertex_to_interval, tree };
    Recognition { sweep, outcome: Ok(representation) }
}

/// Returns a vertex `v` and a non-neighbor `u` with `v < u < furthest neighbor of v` in `order`.
/// Every vertex only scans its own range until the first gap, so this takes O(n + m) time.
fn find_umbrella<G>(graph: G, order: &VertexOrder, neighbor_index: &[usize]) -> Option<(usize, usize)>
where
    G: NodeCompactIndexable + IntoNeighbors,
{
    let mut marked_by = vec![usize::MAX; graph.node_bound()];
    for v in order.iter() {
        for w in graph.neighbors(graph.from_index(v)) {
            marked_by[graph.to_index(w)] = v;
        }
        for i in order.rank(v) + 1..=neighbor_index[v] {
            let u = order.element_at(i);
            if marked_by[u] != v {
                return Some((v, u));
            }
        }
    }
    None
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use petgraph::graph::NodeIndex;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::tests::*;

    fn model(recognition: &Recognition<NodeIndex>) -> HashMap<NodeIndex, Interval<usize>> {
        recognition.vertex_to_interval_map().unwrap().clone()
    }

    #[test]
    fn empty_graph_is_interval_graph() {
        let graph = empty_graph(0);
        let recognition = recognize(&graph);
        assert!(recognition.is_interval_graph());
        assert!(recognition.intervals_sorted_by_start().unwrap().is_empty());
        assert!(recognition.sweep().is_empty());
        assert!(recognition.umbrella().is_none());
    }

    #[test]
    fn independent_set() {
        let graph = empty_graph(5);
        let recognition = recognize(&graph);
        assert!(recognition.is_interval_graph());
        let intervals = recognition.intervals_sorted_by_start().unwrap();
        assert_eq!(intervals, (0..5).map(Interval::point).collect::<Vec<_>>());
        assert!(is_interval_model(&graph, &model(&recognition)));
    }

    #[test]
    fn complete_graph_intervals_share_a_point() {
        let graph = complete_graph(6);
        let recognition = recognize(&graph);
        assert!(recognition.is_interval_graph());
        let intervals = recognition.intervals_sorted_by_start().unwrap();
        assert!(intervals.iter().all(|interval| interval.contains(&5)));
        assert!(is_interval_model(&graph, &model(&recognition)));
    }

    #[test]
    fn paths() {
        for n in 1..10 {
            let graph = path_graph(n);
            let recognition = recognize(&graph);
            assert!(recognition.is_interval_graph(), "path with {n} vertices");
            assert!(is_interval_model(&graph, &model(&recognition)));
        }
    }

    #[test]
    fn stars_cliques_and_caterpillars() {
        for graph in [star_graph(5), disjoint_cliques(&[3, 1, 4]), caterpillar(4, 2)] {
            let recognition = recognize(&graph);
            assert!(recognition.is_interval_graph());
            assert!(is_interval_model(&graph, &model(&recognition)));
        }
    }

    #[test]
    fn cycles_are_rejected() {
        for n in 4..9 {
            let graph = cycle_graph(n);
            let recognition = recognize(&graph);
            assert!(!recognition.is_interval_graph());
            assert_eq!(recognition.representation().err(), Some(RecognitionError::NotIntervalGraph));
            assert_eq!(recognition.intervals_sorted_by_start().err(), Some(RecognitionError::NotIntervalGraph));
            assert!(recognition.interval_to_vertex_map().is_err());
        }
    }

    #[test]
    fn chordal_non_interval_graphs_are_rejected() {
        for graph in [sun_3(), subdivided_claw()] {
            let recognition = recognize(&graph);
            assert!(!recognition.is_interval_graph());
            let Umbrella { vertex, missing } = recognition.umbrella().unwrap();
            assert_ne!(vertex, missing);
            assert!(!graph.contains_edge(vertex, missing));
        }
    }

    #[test]
    fn umbrella_witness_lies_inside_the_range() {
        let graph = cycle_graph(5);
        let recognition = recognize(&graph);
        let Umbrella { vertex, missing } = recognition.umbrella().unwrap();
        let position = |x: NodeIndex| recognition.sweep().iter().position(|&y| y == x).unwrap();
        assert!(position(vertex) < position(missing));
        let furthest = graph.neighbors(vertex).map(position).max().unwrap();
        assert!(position(missing) < furthest);
    }

    #[test]
    fn representation_queries() {
        let graph = path_graph(4);
        let recognition = recognize(&graph);
        let representation = recognition.representation().unwrap();
        assert_eq!(representation.len(), 4);
        for (v, interval) in representation.iter() {
            assert_eq!(representation.interval_of(v), Some(interval));
            let mut overlapping = representation.vertices_overlapping(&interval);
            overlapping.sort();
            let mut expected: Vec<NodeIndex> = graph.neighbors(v).chain([v]).collect();
            expected.sort();
            assert_eq!(overlapping, expected);
        }
        let starts: Vec<usize> = representation.intervals().iter().map(|i| *i.start()).collect();
        assert_eq!(starts, [0, 1, 2, 3]);
        assert_eq!(recognition.interval_to_vertex_map().unwrap().len(), 4);
    }

    #[test]
    fn accepted_graphs_have_valid_models() {
        let mut rng = StdRng::seed_from_u64(3);
        for i in 0..200 {
            let graph = random_graph(3 + i % 8, 0.5, &mut rng);
            let recognition = recognize(&graph);
            if recognition.is_interval_graph() {
                assert!(is_interval_model(&graph, &model(&recognition)));
            } else {
                let Umbrella { vertex, missing } = recognition.umbrella().unwrap();
                assert!(!graph.contains_edge(vertex, missing));
            }
        }
    }

    #[test]
    fn small_graphs_agree_with_exhaustive_search() {
        let mut rng = StdRng::seed_from_u64(17);
        for i in 0..300 {
            let n = 1 + i % 8;
            let graph = if i % 2 == 0 {
                random_interval_graph(n, 2 + i % 10, &mut rng)
            } else {
                random_graph(n, 0.3 + 0.1 * (i % 5) as f64, &mut rng)
            };
            let expected = is_interval_graph_brute_force(&graph);
            assert_eq!(recognize(&graph).is_interval_graph(), expected, "{:?}", graph);
        }
    }
}
