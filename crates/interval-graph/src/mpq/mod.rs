//! Incremental interval graph recognition with modified PQ-trees, following Korte and Möhring.
//!
//! The vertices are inserted in LBFS order, so the earlier neighbors of every vertex form a
//! clique. The tree keeps all orders of the maximal cliques of the graph seen so far in which
//! the cliques of every vertex are consecutive. Inserting a vertex `u` with earlier neighbors `P`
//! adds the clique `P ∪ {u}`:
//!
//! 1. The owners of `P` and their ancestors are marked. The marked nodes must form a path from
//!    the root down to the lowest marked node `X`.
//! 2. `H` is the highest node on the path holding a vertex outside `P` on the path. If there is
//!    none, or `H = X`, the clique is added at `X`.
//! 3. Otherwise the clique has to be placed next to the subtree of `H`. The path from `X` to `H`
//!    is flattened into a sequence of sections ending in the new clique, which replaces `H` or
//!    is merged into the Q-node `H`.
//!
//! When the position of the new clique is fixed by neither the tree nor the path, the
//! recognition stops with [MpqRecognition::Inconclusive]. Use [recognize](crate::recognize) for
//! a complete test.

mod tree;

use petgraph::visit::{GraphProp, IntoNeighbors, NodeCompactIndexable};
use petgraph::Undirected;
use tracing::{debug, info, instrument, trace};

use crate::chordal::earlier_neighbors_not_a_clique;
use crate::lbfs::lbfs;
pub use tree::MpqTree;
use tree::{Arena, MpqNode, Shape};

/// Reasons for rejecting a graph.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum Obstruction {
    /// The graph has a chordless cycle of length at least four.
    NotChordal,
    /// The owners of the earlier neighbors lie in different branches of the tree.
    Branching,
    /// An earlier neighbor is not assigned to the section that leads to the other earlier
    /// neighbors.
    SplitSection,
    /// No order of the cliques lists the cliques of every vertex consecutively.
    Umbrella,
}

/// The result of [mpq_recognize].
#[derive(Clone, Debug)]
pub enum MpqRecognition<V> {
    /// The graph is an interval graph.
    Interval(MpqTree<V>),
    /// The graph is not an interval graph. `vertex` is the vertex whose insertion failed.
    NotInterval {
        /// The vertex whose insertion failed.
        vertex: V,
        /// Why the graph was rejected.
        obstruction: Obstruction,
    },
    /// The recognition stopped at `vertex`, which fits into the tree in more than one way that
    /// the tree cannot express.
    Inconclusive {
        /// The vertex whose insertion stopped the recognition.
        vertex: V,
    },
}

impl<V> MpqRecognition<V> {
    /// Returns whether the graph is an interval graph, or `None` if the recognition was
    /// inconclusive.
    pub fn is_interval_graph(&self) -> Option<bool> {
        match self {
            MpqRecognition::Interval(_) => Some(true),
            MpqRecognition::NotInterval { .. } => Some(false),
            MpqRecognition::Inconclusive { .. } => None,
        }
    }

    /// Returns the tree of an interval graph.
    pub fn tree(&self) -> Option<&MpqTree<V>> {
        match self {
            MpqRecognition::Interval(tree) => Some(tree),
            _ => None,
        }
    }
}

/// Tests whether `graph` is an interval graph by building a modified PQ-tree.
///
/// ```rust
/// use petgraph::graph::UnGraph;
/// use interval_graph::mpq::{mpq_recognize, MpqRecognition, Obstruction};
///
/// let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 3)]);
/// let MpqRecognition::Interval(tree) = mpq_recognize(&graph) else { panic!() };
/// assert_eq!(tree.cliques().len(), 3);
///
/// let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 3), (3, 0)]);
/// assert!(matches!(
///     mpq_recognize(&graph),
///     MpqRecognition::NotInterval { obstruction: Obstruction::NotChordal, .. }
/// ));
/// ```
#[instrument(skip_all)]
pub fn mpq_recognize<G>(graph: G) -> MpqRecognition<G::NodeId>
where
    G: NodeCompactIndexable + IntoNeighbors + GraphProp<EdgeType = Undirected>,
{
    let n = graph.node_bound();
    info!(number_of_nodes = n);
    let order = lbfs(graph);
    if let Some(v) = earlier_neighbors_not_a_clique(graph, &order) {
        info!(is_chordal = false);
        return MpqRecognition::NotInterval { vertex: graph.from_index(v), obstruction: Obstruction::NotChordal };
    }

    let mut updater = Updater::new(n);
    let mut predecessors = vec![];
    for u in order.iter() {
        predecessors.clear();
        predecessors.extend(
            graph.neighbors(graph.from_index(u)).map(|w| graph.to_index(w)).filter(|&w| order.rank(w) < order.rank(u)),
        );
        predecessors.sort_unstable();
        predecessors.dedup();

        if let Err(failure) = updater.insert(u, &predecessors) {
            let vertex = graph.from_index(u);
            info!(?failure, vertex = u);
            return match failure {
                Failure::Obstruction(obstruction) => MpqRecognition::NotInterval { vertex, obstruction },
                Failure::Ambiguous => MpqRecognition::Inconclusive { vertex },
            };
        }
    }

    if !is_clique_model(graph, &updater.arena.spans()) {
        if let Some(last) = order.last() {
            info!(is_clique_model = false);
            return MpqRecognition::Inconclusive { vertex: graph.from_index(last) };
        }
    }

    let vertices = (0..n).map(|v| graph.from_index(v)).collect();
    let tree = MpqTree::new(updater.arena, vertices);
    info!(number_of_tree_nodes = tree.node_count());
    MpqRecognition::Interval(tree)
}

/// Whether the clique spans of the vertices intersect exactly for adjacent vertices. Runs in
/// O(n log n + m log m), as every intersecting pair that is counted is an edge.
fn is_clique_model<G>(graph: G, spans: &[Option<(usize, usize)>]) -> bool
where
    G: NodeCompactIndexable + IntoNeighbors,
{
    let mut by_start = Vec::with_capacity(spans.len());
    for (v, span) in spans.iter().enumerate() {
        let Some((start, end)) = *span else {
            return false;
        };
        by_start.push((start, end, v));
    }
    by_start.sort_unstable();

    let neighbors: Vec<Vec<usize>> = (0..spans.len())
        .map(|v| {
            let mut list: Vec<usize> =
                graph.neighbors(graph.from_index(v)).map(|w| graph.to_index(w)).filter(|&w| w != v).collect();
            list.sort_unstable();
            list.dedup();
            list
        })
        .collect();
    let edges = neighbors.iter().map(Vec::len).sum::<usize>() / 2;

    let mut intersecting = 0;
    for (i, &(_, end, u)) in by_start.iter().enumerate() {
        for &(_, _, w) in by_start[i + 1..].iter().take_while(|&&(start, _, _)| start <= end) {
            if neighbors[u].binary_search(&w).is_err() {
                return false;
            }
            intersecting += 1;
        }
    }
    intersecting == edges
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Failure {
    Obstruction(Obstruction),
    Ambiguous,
}

impl From<Obstruction> for Failure {
    fn from(obstruction: Obstruction) -> Self {
        Failure::Obstruction(obstruction)
    }
}

/// A node on the marked path. For Q-nodes above the lowest marked node, `via` is the position
/// of the section the path continues through.
#[derive(Copy, Clone, Debug)]
struct PathEntry {
    node: MpqNode,
    via: Option<usize>,
}

/// A section that is not allocated yet.
#[derive(Clone, Debug)]
struct SectionSpec {
    members: Vec<usize>,
    child: MpqNode,
}

struct Updater {
    arena: Arena,
    /// Earlier neighbors of the current vertex carry the current step.
    adjacent: Vec<u32>,
    step: u32,
    /// Nodes that are freed once the current insertion is done.
    retired: Vec<MpqNode>,
}

impl Updater {
    fn new(n: usize) -> Self {
        Self { arena: Arena::new(n), adjacent: vec![0; n], step: 0, retired: vec![] }
    }

    fn is_adjacent(&self, v: usize) -> bool {
        self.adjacent[v] == self.step
    }

    fn is_marked(&self, node: MpqNode) -> bool {
        self.arena[node].mark == self.step
    }

    fn insert(&mut self, u: usize, predecessors: &[usize]) -> Result<(), Failure> {
        self.step += 1;
        if predecessors.is_empty() {
            self.attach_isolated(u);
            return Ok(());
        }
        for &p in predecessors {
            self.adjacent[p] = self.step;
        }
        let result = self.update(u, predecessors);
        for node in std::mem::take(&mut self.retired) {
            self.arena.release(node);
        }
        result
    }

    fn attach_isolated(&mut self, u: usize) {
        let leaf = self.arena.alloc(Shape::Leaf, vec![u]);
        let root = self.arena.root;
        if root.is_nil() {
            self.arena.root = leaf;
        } else if matches!(self.arena[root].shape, Shape::P(_)) && self.arena.members(root).is_empty() {
            self.arena.push_child(root, leaf);
        } else {
            self.arena.root = self.arena.alloc(Shape::P(vec![root, leaf]), vec![]);
        }
    }

    fn update(&mut self, u: usize, predecessors: &[usize]) -> Result<(), Failure> {
        self.mark_ancestors(predecessors);
        let path = self.marked_path()?;
        self.check_sections(&path)?;

        let x = path.len() - 1;
        let highest = path.iter().position(|entry| !self.is_full(entry));
        trace!(vertex = u, path_length = path.len(), ?highest);
        match highest {
            Some(h) if h < x => self.insert_beside(u, &path, h),
            _ => self.insert_below(u, path[x].node),
        }
    }

    fn mark_ancestors(&mut self, predecessors: &[usize]) {
        let owners: Vec<MpqNode> = predecessors.iter().flat_map(|&p| self.arena.owners(p).iter().copied()).collect();
        for mut node in owners {
            while !node.is_nil() && !self.is_marked(node) {
                self.arena[node].mark = self.step;
                node = self.arena[node].parent;
            }
        }
    }

    /// Follows the marked nodes from the root to the lowest one.
    fn marked_path(&self) -> Result<Vec<PathEntry>, Failure> {
        let mut path = vec![];
        let mut node = self.arena.root;
        loop {
            let (via, next) = match &self.arena[node].shape {
                Shape::Leaf | Shape::Section(_) => (None, None),
                Shape::P(children) => {
                    let mut marked = children.iter().copied().filter(|&child| self.is_marked(child));
                    let next = marked.next();
                    if marked.next().is_some() {
                        return Err(Obstruction::Branching.into());
                    }
                    (None, next)
                }
                Shape::Q(sections) => {
                    let mut marked = sections
                        .iter()
                        .enumerate()
                        .map(|(i, &section)| (i, self.arena.child(section)))
                        .filter(|&(_, child)| self.is_marked(child));
                    let next = marked.next();
                    if marked.next().is_some() {
                        return Err(Obstruction::Branching.into());
                    }
                    (next.map(|(i, _)| i), next.map(|(_, child)| child))
                }
            };
            path.push(PathEntry { node, via });
            match next {
                Some(next) => node = next,
                None => return Ok(path),
            }
        }
    }

    /// The earlier neighbors in a Q-node on the path must all reach the section the path runs
    /// through.
    fn check_sections(&self, path: &[PathEntry]) -> Result<(), Failure> {
        for entry in path {
            let Some(i) = entry.via else {
                continue;
            };
            let sections = self.arena.sections(entry.node);
            for &section in sections {
                for &v in self.arena.members(section) {
                    if self.is_adjacent(v) && !self.arena.owns(v, sections[i]) {
                        return Err(Obstruction::SplitSection.into());
                    }
                }
            }
        }
        Ok(())
    }

    /// Whether all vertices the entry puts on the path are earlier neighbors. The lowest node is
    /// always full if it is a Q-node, as the new clique may be placed between its sections.
    fn is_full(&self, entry: &PathEntry) -> bool {
        let node = match entry.via {
            Some(i) => self.arena.sections(entry.node)[i],
            None if self.arena.is_q(entry.node) => return true,
            None => entry.node,
        };
        self.arena.members(node).iter().all(|&v| self.is_adjacent(v))
    }

    fn adjacent_members(&self, sections: &[MpqNode]) -> Vec<usize> {
        let mut adjacent: Vec<usize> = sections
            .iter()
            .flat_map(|&section| self.arena.members(section).iter().copied())
            .filter(|&v| self.is_adjacent(v))
            .collect();
        adjacent.sort_unstable();
        adjacent.dedup();
        adjacent
    }

    fn take_non_adjacent(&mut self, node: MpqNode) -> Vec<usize> {
        let (adjacent, step) = (&self.adjacent, self.step);
        self.arena.take_members(node, |v| adjacent[v] != step)
    }

    fn new_leaf(&mut self, u: usize) -> MpqNode {
        self.arena.alloc(Shape::Leaf, vec![u])
    }

    /// A single node, or an empty P-node over several.
    fn group(&mut self, nodes: Vec<MpqNode>) -> MpqNode {
        match nodes[..] {
            [node] => node,
            _ => self.arena.alloc(Shape::P(nodes), vec![]),
        }
    }

    fn retire(&mut self, node: MpqNode) {
        self.retired.push(node);
    }

    /// Adds the clique at the lowest marked node `x`. All nodes above `x` are full.
    fn insert_below(&mut self, u: usize, x: MpqNode) -> Result<(), Failure> {
        match self.arena[x].shape {
            Shape::Leaf => {
                let outside = self.take_non_adjacent(x);
                if outside.is_empty() {
                    self.arena.add_member(x, u);
                } else {
                    let rest = self.arena.alloc(Shape::Leaf, outside);
                    let leaf = self.new_leaf(u);
                    self.arena.set_shape(x, Shape::P(vec![rest, leaf]));
                }
            }
            Shape::P(_) => {
                let outside = self.take_non_adjacent(x);
                let leaf = self.new_leaf(u);
                if outside.is_empty() {
                    self.arena.push_child(x, leaf);
                } else {
                    let children = self.arena.children(x);
                    let rest = self.arena.alloc(Shape::P(children), outside);
                    self.arena.set_shape(x, Shape::P(vec![rest, leaf]));
                }
            }
            Shape::Q(_) => self.insert_into_q(u, x)?,
            Shape::Section(_) => unreachable!("sections are never the lowest marked node"),
        }
        Ok(())
    }

    /// Places the clique inside the Q-node `q`, either below one of its sections or as a new
    /// section between two of them.
    fn insert_into_q(&mut self, u: usize, q: MpqNode) -> Result<(), Failure> {
        let sections = self.arena.sections(q).to_vec();
        let m = sections.len();
        let adjacent = self.adjacent_members(&sections);
        let spans = |v: usize, i: usize| self.arena.owns(v, sections[i]);

        let below: Vec<usize> = (0..m)
            .filter(|&i| {
                self.arena.members(sections[i]).iter().all(|&v| self.is_adjacent(v))
                    && adjacent.iter().all(|&v| spans(v, i))
            })
            .collect();
        let gaps: Vec<usize> = (0..=m).filter(|&g| self.is_open_gap(&sections, &adjacent, g)).collect();
        debug!(?below, ?gaps);

        match (&below[..], &gaps[..]) {
            (&[i], _) if gaps.iter().all(|&g| g == i || g == i + 1) => {
                self.insert_below_section(u, sections[i]);
                Ok(())
            }
            ([], []) => Err(Obstruction::Umbrella.into()),
            ([], &[g]) => {
                let leaf = self.new_leaf(u);
                let section = self.arena.alloc(Shape::Section(leaf), adjacent);
                let mut sections = sections;
                sections.insert(g, section);
                self.arena.set_shape(q, Shape::Q(sections));
                Ok(())
            }
            ([], &[0, g]) if g == m => {
                // The earlier neighbors span every section, the clique goes to either end.
                for &section in &sections {
                    self.arena.take_members(section, |v| adjacent.binary_search(&v).is_ok());
                }
                let parent = self.arena[q].parent;
                let leaf = self.new_leaf(u);
                let p = self.arena.alloc(Shape::P(vec![q, leaf]), adjacent);
                self.arena.replace_child(parent, q, p);
                Ok(())
            }
            _ => Err(Failure::Ambiguous),
        }
    }

    /// A new section fits into gap `g`, between the sections `g - 1` and `g`, if every vertex in
    /// both of them is adjacent and every adjacent vertex reaches the gap.
    fn is_open_gap(&self, sections: &[MpqNode], adjacent: &[usize], g: usize) -> bool {
        let left = g.checked_sub(1).map(|i| sections[i]);
        let right = sections.get(g).copied();
        if let (Some(left), Some(right)) = (left, right) {
            if self.arena.members(left).iter().any(|&v| self.arena.owns(v, right) && !self.is_adjacent(v)) {
                return false;
            }
        }
        adjacent.iter().all(|&v| [left, right].into_iter().flatten().any(|section| self.arena.owns(v, section)))
    }

    fn insert_below_section(&mut self, u: usize, section: MpqNode) {
        let child = self.arena.child(section);
        let empty = self.arena.members(child).is_empty();
        match self.arena[child].shape {
            Shape::Leaf if empty => self.arena.add_member(child, u),
            Shape::P(_) if empty => {
                let leaf = self.new_leaf(u);
                self.arena.push_child(child, leaf);
            }
            _ => {
                let leaf = self.new_leaf(u);
                let p = self.arena.alloc(Shape::P(vec![child, leaf]), vec![]);
                self.arena.replace_child(section, child, p);
            }
        }
    }

    /// Places the clique next to the subtree of `path[h]`, which holds a vertex outside the
    /// clique.
    fn insert_beside(&mut self, u: usize, path: &[PathEntry], h: usize) -> Result<(), Failure> {
        let x = path.len() - 1;
        let top = path[h].node;
        let parent = self.arena[top].parent;

        let mut fragment = self.fragment_at(u, path[x].node)?;
        for k in (h..x).rev() {
            let PathEntry { node, via } = path[k];
            fragment = match via {
                None => self.merge_p(node, path[k + 1].node, fragment),
                Some(i) if k > h => self.merge_q(node, i, fragment)?,
                Some(i) => return self.merge_into(node, i, fragment),
            };
            self.retire(node);
        }

        let q = self.materialize(fragment);
        self.arena.replace_child(parent, top, q);
        Ok(())
    }

    /// The sections of the subtree of `x` followed by the new clique. The earlier neighbors in the
    /// subtree reach the new clique.
    fn fragment_at(&mut self, u: usize, x: MpqNode) -> Result<Vec<SectionSpec>, Failure> {
        let fragment = match self.arena[x].shape {
            Shape::Leaf => {
                let outside = self.take_non_adjacent(x);
                let inside = self.arena.members(x).to_vec();
                let rest = self.arena.alloc(Shape::Leaf, outside);
                let leaf = self.new_leaf(u);
                self.retire(x);
                vec![SectionSpec { members: inside.clone(), child: rest }, SectionSpec { members: inside, child: leaf }]
            }
            Shape::P(_) => {
                let members = self.arena.members(x).to_vec();
                let inside = members.iter().copied().filter(|&v| self.is_adjacent(v)).collect();
                let children = self.arena.children(x);
                let rest = self.group(children);
                let leaf = self.new_leaf(u);
                self.retire(x);
                vec![SectionSpec { members, child: rest }, SectionSpec { members: inside, child: leaf }]
            }
            Shape::Q(_) => {
                let mut sections = self.arena.sections(x).to_vec();
                let m = sections.len();
                let adjacent = self.adjacent_members(&sections);
                let reaches = |i: usize| adjacent.iter().all(|&v| self.arena.owns(v, sections[i]));

                if (0..m).all(reaches) {
                    // The subtree of `x` may face the new clique with either end.
                    let common: Vec<usize> = self
                        .arena
                        .members(sections[0])
                        .iter()
                        .copied()
                        .filter(|&v| sections.iter().all(|&section| self.arena.owns(v, section)))
                        .collect();
                    for &section in &sections {
                        self.arena.take_members(section, |v| common.contains(&v));
                    }
                    let leaf = self.new_leaf(u);
                    return Ok(vec![SectionSpec { members: common, child: x }, SectionSpec { members: adjacent, child: leaf }]);
                }
                if !reaches(m - 1) {
                    if !reaches(0) {
                        return Err(Obstruction::Umbrella.into());
                    }
                    sections.reverse();
                }

                let mut fragment = self.unpack(&sections);
                self.retire(x);
                let leaf = self.new_leaf(u);
                fragment.push(SectionSpec { members: adjacent, child: leaf });
                fragment
            }
            Shape::Section(_) => unreachable!("sections are never the lowest marked node"),
        };
        Ok(fragment)
    }

    /// Turns sections into specs and retires them.
    fn unpack(&mut self, sections: &[MpqNode]) -> Vec<SectionSpec> {
        let specs = sections
            .iter()
            .map(|&section| SectionSpec {
                members: self.arena.members(section).to_vec(),
                child: self.arena.child(section),
            })
            .collect();
        for &section in sections {
            self.retire(section);
        }
        specs
    }

    /// Extends the fragment of the child `below` to the P-node `y`. The other children of `y`
    /// are kept together at the far end from the new clique.
    fn merge_p(&mut self, y: MpqNode, below: MpqNode, fragment: Vec<SectionSpec>) -> Vec<SectionSpec> {
        let members = self.arena.members(y).to_vec();
        let inside: Vec<usize> = members.iter().copied().filter(|&v| self.is_adjacent(v)).collect();
        let others: Vec<MpqNode> = self.arena.children(y).into_iter().filter(|&child| child != below).collect();

        let mut merged = Vec::with_capacity(fragment.len() + 1);
        if !others.is_empty() {
            let child = self.group(others);
            merged.push(SectionSpec { members: members.clone(), child });
        }
        let last = fragment.len() - 1;
        for (j, mut spec) in fragment.into_iter().enumerate() {
            spec.members.extend(if j == last { &inside } else { &members });
            merged.push(spec);
        }
        merged
    }

    /// Extends the fragment of the section `i` to the Q-node `y`. The section has to be at one
    /// end, as the new clique lies outside of `y`. Only the adjacent members of the section reach
    /// the new clique.
    fn merge_q(&mut self, y: MpqNode, i: usize, fragment: Vec<SectionSpec>) -> Result<Vec<SectionSpec>, Failure> {
        let mut sections = self.arena.sections(y).to_vec();
        let m = sections.len();
        if i + 1 != m {
            if i != 0 {
                return Err(Obstruction::Umbrella.into());
            }
            sections.reverse();
        }
        let through = sections.pop().expect("Q-nodes have sections");
        let members = self.arena.members(through).to_vec();
        let inside: Vec<usize> = members.iter().copied().filter(|&v| self.is_adjacent(v)).collect();
        self.retire(through);

        let mut merged = self.unpack(&sections);
        let last = fragment.len() - 1;
        for (j, mut spec) in fragment.into_iter().enumerate() {
            spec.members.extend(if j == last { &inside } else { &members });
            merged.push(spec);
        }
        Ok(merged)
    }

    /// Merges the fragment into the Q-node `h` in place of its section `i`, which holds a vertex
    /// outside the new clique. The new clique goes to a side of the section where every shared
    /// vertex is adjacent. If both sides work, the fragment becomes a Q-node below the section.
    fn merge_into(&mut self, h: MpqNode, i: usize, mut fragment: Vec<SectionSpec>) -> Result<(), Failure> {
        let sections = self.arena.sections(h).to_vec();
        let m = sections.len();
        let through = sections[i];
        let members = self.arena.members(through).to_vec();
        let shared_adjacent =
            |other: MpqNode| members.iter().all(|&v| !self.arena.owns(v, other) || self.is_adjacent(v));
        let right = i + 1 == m || shared_adjacent(sections[i + 1]);
        let left = i == 0 || shared_adjacent(sections[i - 1]);
        let last = fragment.len() - 1;

        match (left, right) {
            (false, false) => Err(Obstruction::Umbrella.into()),
            (true, true) => {
                let outside = self.take_non_adjacent(through);
                for spec in &mut fragment[..last] {
                    spec.members.extend(&outside);
                }
                let old = self.arena.child(through);
                let q = self.materialize(fragment);
                self.arena.replace_child(through, old, q);
                Ok(())
            }
            (left, _) => {
                let inside: Vec<usize> = members.iter().copied().filter(|&v| self.is_adjacent(v)).collect();
                for (j, spec) in fragment.iter_mut().enumerate() {
                    spec.members.extend(if j == last { &inside } else { &members });
                }
                if left {
                    fragment.reverse();
                }
                let mut merged = sections[..i].to_vec();
                for spec in fragment {
                    merged.push(self.alloc_section(spec));
                }
                merged.extend_from_slice(&sections[i + 1..]);
                self.arena.set_shape(h, Shape::Q(merged));
                self.retire(through);
                Ok(())
            }
        }
    }

    fn alloc_section(&mut self, spec: SectionSpec) -> MpqNode {
        self.arena.alloc(Shape::Section(spec.child), spec.members)
    }

    fn materialize(&mut self, fragment: Vec<SectionSpec>) -> MpqNode {
        let sections = fragment.into_iter().map(|spec| self.alloc_section(spec)).collect();
        self.arena.alloc(Shape::Q(sections), vec![])
    }
}
