//! Graph families shared by the unit tests.

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use rand::Rng;

use crate::interval::Interval;

pub(crate) fn empty_graph(n: usize) -> UnGraph<(), ()> {
    let mut graph = UnGraph::new_undirected();
    for _ in 0..n {
        graph.add_node(());
    }
    graph
}

pub(crate) fn complete_graph(n: usize) -> UnGraph<(), ()> {
    let mut graph = empty_graph(n);
    for i in 0..n {
        for j in i + 1..n {
            graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
        }
    }
    graph
}

pub(crate) fn path_graph(n: usize) -> UnGraph<(), ()> {
    let mut graph = empty_graph(n);
    for i in 1..n {
        graph.add_edge(NodeIndex::new(i - 1), NodeIndex::new(i), ());
    }
    graph
}

pub(crate) fn cycle_graph(n: usize) -> UnGraph<(), ()> {
    let mut graph = path_graph(n);
    if n > 2 {
        graph.add_edge(NodeIndex::new(n - 1), NodeIndex::new(0), ());
    }
    graph
}

/// Vertex `0` is the center.
pub(crate) fn star_graph(leaves: usize) -> UnGraph<(), ()> {
    let mut graph = empty_graph(leaves + 1);
    for i in 1..=leaves {
        graph.add_edge(NodeIndex::new(0), NodeIndex::new(i), ());
    }
    graph
}

/// Cliques of the given sizes on consecutive vertex indices.
pub(crate) fn disjoint_cliques(sizes: &[usize]) -> UnGraph<(), ()> {
    let mut graph = empty_graph(sizes.iter().sum());
    let mut offset = 0;
    for &size in sizes {
        for i in offset..offset + size {
            for j in i + 1..offset + size {
                graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
            }
        }
        offset += size;
    }
    graph
}

/// A path `0..spine` where every spine vertex has `legs` pendant vertices.
pub(crate) fn caterpillar(spine: usize, legs: usize) -> UnGraph<(), ()> {
    let mut graph = path_graph(spine);
    for i in 0..spine {
        for _ in 0..legs {
            let leg = graph.add_node(());
            graph.add_edge(NodeIndex::new(i), leg, ());
        }
    }
    graph
}

/// The triangle `0, 1, 2` with the ears `3 ~ {0, 1}`, `4 ~ {1, 2}` and `5 ~ {0, 2}`. Chordal, but
/// not an interval graph.
pub(crate) fn sun_3() -> UnGraph<(), ()> {
    UnGraph::from_edges([(0, 1), (1, 2), (0, 2), (3, 0), (3, 1), (4, 1), (4, 2), (5, 0), (5, 2)])
}

/// The claw with every edge subdivided. A tree, so chordal, but not an interval graph.
pub(crate) fn subdivided_claw() -> UnGraph<(), ()> {
    UnGraph::from_edges([(0, 1), (1, 2), (0, 3), (3, 4), (0, 5), (5, 6)])
}

pub(crate) fn random_graph(n: usize, p: f64, rng: &mut impl Rng) -> UnGraph<(), ()> {
    let mut graph = empty_graph(n);
    for i in 0..n {
        for j in i + 1..n {
            if rng.gen_bool(p) {
                graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
            }
        }
    }
    graph
}

/// The intersection graph of random intervals with integer end points in `0..span`.
pub(crate) fn random_interval_graph(n: usize, span: usize, rng: &mut impl Rng) -> UnGraph<(), ()> {
    let intervals: Vec<Interval<usize>> = (0..n)
        .map(|_| {
            let start = rng.gen_range(0..span);
            let end = rng.gen_range(start..span);
            Interval::new(start, end).unwrap()
        })
        .collect();
    let mut graph = empty_graph(n);
    for i in 0..n {
        for j in i + 1..n {
            if intervals[i].intersects(&intervals[j]) {
                graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
            }
        }
    }
    graph
}

/// Returns whether two vertices are adjacent exactly if their intervals intersect.
pub(crate) fn is_interval_model<T: Ord>(graph: &UnGraph<(), ()>, model: &HashMap<NodeIndex, Interval<T>>) -> bool {
    if model.len() != graph.node_count() {
        return false;
    }
    for u in graph.node_indices() {
        for v in graph.node_indices() {
            if u >= v {
                continue;
            }
            let (Some(a), Some(b)) = (model.get(&u), model.get(&v)) else {
                return false;
            };
            if graph.contains_edge(u, v) != a.intersects(b) {
                return false;
            }
        }
    }
    true
}

/// Brute force interval test for small graphs: some order of the maximal cliques lists every
/// vertex consecutively.
pub(crate) fn is_interval_graph_brute_force(graph: &UnGraph<(), ()>) -> bool {
    let n = graph.node_count();
    assert!(n <= 8);
    let adjacent = |u: usize, v: usize| graph.contains_edge(NodeIndex::new(u), NodeIndex::new(v));

    let is_clique = |set: u32| {
        (0..n).all(|u| set & (1 << u) == 0 || (u + 1..n).all(|v| set & (1 << v) == 0 || adjacent(u, v)))
    };
    let cliques: Vec<u32> = (1..1_u32 << n).filter(|&set| is_clique(set)).collect();
    let maximal: Vec<u32> =
        cliques.iter().copied().filter(|&c| !cliques.iter().any(|&d| d != c && d & c == c)).collect();
    // Interval graphs are chordal and have at most n maximal cliques.
    if maximal.len() > n {
        return false;
    }

    let mut order: Vec<usize> = (0..maximal.len()).collect();
    permutations_any(&mut order, 0, &|order: &[usize]| {
        (0..n).all(|v| {
            let positions: Vec<usize> = (0..order.len()).filter(|&i| maximal[order[i]] & (1 << v) != 0).collect();
            positions.windows(2).all(|w| w[1] == w[0] + 1)
        })
    }) || n == 0
}

fn permutations_any(items: &mut [usize], k: usize, check: &dyn Fn(&[usize]) -> bool) -> bool {
    if k == items.len() {
        return check(items);
    }
    for i in k..items.len() {
        items.swap(k, i);
        if permutations_any(items, k + 1, check) {
            return true;
        }
        items.swap(k, i);
    }
    false
}
