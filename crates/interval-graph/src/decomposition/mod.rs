//! Nice tree and path decompositions.
//!
//! A nice decomposition is a rooted tree whose nodes carry bags of vertices. Read against its
//! children, every node is a leaf, introduces one vertex, forgets one vertex, or joins two
//! children with the same bag. [DecompositionBuilder] grows such a tree from the root downwards,
//! the functions in [chordal] and [interval] drive it for chordal and interval graphs.

pub mod chordal;
pub mod interval;

use std::collections::{BTreeSet, HashMap};
use std::fmt::{Debug, Formatter};
use std::hash::Hash;

use petgraph::graph::DiGraph;
use petgraph::visit::{GraphBase, GraphProp, IntoNeighbors, NodeCompactIndexable};
use petgraph::{Incoming, Outgoing, Undirected};
use thiserror::Error;

use crate::ordering::OrderError;

/// A set of vertices attached to a decomposition node.
pub type Bag<V> = BTreeSet<V>;

/// Node identifier in a [NiceDecomposition].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BagIndex(pub(crate) petgraph::graph::NodeIndex);

impl Debug for BagIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BagIndex").field(&self.0.index()).finish()
    }
}

impl BagIndex {
    /// Create new index from `usize`.
    pub fn new(x: usize) -> Self {
        Self(petgraph::graph::NodeIndex::new(x))
    }

    /// Returns the index as `usize`.
    pub fn index(&self) -> usize {
        self.0.index()
    }
}

/// Kinds of nodes in a [NiceDecomposition], determined by comparing the bag of a node with the
/// bags of its children.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum NodeKind<V> {
    /// A node without children.
    Leaf,
    /// One child, whose bag lacks the vertex.
    Introduce(V),
    /// One child, whose bag additionally holds the vertex.
    Forget(V),
    /// Two children with the same bag as the node.
    Join,
}

/// The bag size every leaf is reduced to by [DecompositionBuilder::leaf_closure].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Terminal {
    /// Leaves have empty bags.
    Empty,
    /// Leaves hold a single vertex.
    Singleton,
}

impl Terminal {
    fn bag_size(self) -> usize {
        match self {
            Terminal::Empty => 0,
            Terminal::Singleton => 1,
        }
    }
}

/// Errors of the decomposition builders.
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
pub enum DecompositionError {
    /// The node does not exist.
    #[error("decomposition node {0:?} does not exist")]
    UnknownNode(BagIndex),
    /// Nodes are only extended at the leaves.
    #[error("decomposition node {0:?} is not a leaf")]
    NotALeaf(BagIndex),
    /// The vertex to introduce is already present.
    #[error("vertex is already in the bag of {0:?}")]
    VertexAlreadyInBag(BagIndex),
    /// The vertex to forget is not present.
    #[error("vertex is not in the bag of {0:?}")]
    VertexNotInBag(BagIndex),
    /// The input graph has no perfect elimination order.
    #[error("graph is not chordal")]
    NotChordal,
    /// The input graph has no interval representation.
    #[error("graph is not an interval graph")]
    NotIntervalGraph,
    /// The given vertex sequence is not an order over the vertices of the graph.
    #[error(transparent)]
    InvalidOrder(#[from] OrderError),
}

/// Grows a nice decomposition from the root towards the leaves.
///
/// The operations are named after the step from a node to its new child. [NodeKind] reads the
/// tree the other way round, so forgetting a vertex below a node makes that node introduce it.
///
/// ```rust
/// # use std::error::Error;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use interval_graph::decomposition::{Bag, DecompositionBuilder, NodeKind, Terminal};
///
/// let mut builder = DecompositionBuilder::new(Bag::new());
/// let a = builder.add_introduce(1, builder.root())?;
/// let b = builder.add_introduce(2, a)?;
/// let (left, right) = builder.add_join(b)?;
/// builder.add_forget(1, right)?;
/// builder.leaf_closure(Terminal::Empty);
///
/// let decomposition = builder.finish();
/// assert!(decomposition.is_nice());
/// assert_eq!(decomposition.node_kind(b), Some(NodeKind::Join));
/// assert_eq!(decomposition.node_kind(left), Some(NodeKind::Introduce(1)));
/// assert_eq!(decomposition.width(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct DecompositionBuilder<V> {
    tree: DiGraph<Bag<V>, ()>,
    root: BagIndex,
}

impl<V: Copy + Ord> DecompositionBuilder<V> {
    /// Create a tree consisting of a root with the given bag.
    pub fn new(root_bag: Bag<V>) -> Self {
        let mut tree = DiGraph::new();
        let root = BagIndex(tree.add_node(root_bag));
        Self { tree, root }
    }

    /// Returns the root node.
    pub fn root(&self) -> BagIndex {
        self.root
    }

    /// Returns the bag of `node`.
    pub fn bag(&self, node: BagIndex) -> Option<&Bag<V>> {
        self.tree.node_weight(node.0)
    }

    /// Returns whether `node` has no children.
    pub fn is_leaf(&self, node: BagIndex) -> bool {
        self.tree.neighbors_directed(node.0, Outgoing).next().is_none()
    }

    /// Returns all nodes without children.
    pub fn leaves(&self) -> Vec<BagIndex> {
        self.tree.externals(Outgoing).map(BagIndex).collect()
    }

    /// Adds a child to the leaf `node` whose bag additionally holds `vertex`.
    pub fn add_introduce(&mut self, vertex: V, node: BagIndex) -> Result<BagIndex, DecompositionError> {
        let bag = self.leaf_bag(node)?;
        if bag.contains(&vertex) {
            return Err(DecompositionError::VertexAlreadyInBag(node));
        }
        let mut bag = bag.clone();
        bag.insert(vertex);
        Ok(self.push_child(node, bag))
    }

    /// Adds a child to the leaf `node` whose bag lacks `vertex`.
    pub fn add_forget(&mut self, vertex: V, node: BagIndex) -> Result<BagIndex, DecompositionError> {
        let bag = self.leaf_bag(node)?;
        if !bag.contains(&vertex) {
            return Err(DecompositionError::VertexNotInBag(node));
        }
        let mut bag = bag.clone();
        bag.remove(&vertex);
        Ok(self.push_child(node, bag))
    }

    /// Adds two children with the bag of `node`. The previous children of `node` are moved below
    /// the second child, so the first one is a fresh leaf. Returns `(left, right)`.
    pub fn add_join(&mut self, node: BagIndex) -> Result<(BagIndex, BagIndex), DecompositionError> {
        let bag = self.bag(node).ok_or(DecompositionError::UnknownNode(node))?.clone();
        let children: Vec<_> = self.tree.neighbors_directed(node.0, Outgoing).collect();
        let left = self.tree.add_node(bag.clone());
        let right = self.tree.add_node(bag);
        for child in children {
            if let Some(edge) = self.tree.find_edge(node.0, child) {
                self.tree.remove_edge(edge);
            }
            self.tree.add_edge(right, child, ());
        }
        self.tree.add_edge(node.0, left, ());
        self.tree.add_edge(node.0, right, ());
        Ok((BagIndex(left), BagIndex(right)))
    }

    /// Forgets vertices below every leaf, smallest first, until the leaf bags have the size
    /// required by `terminal`.
    pub fn leaf_closure(&mut self, terminal: Terminal) {
        let target = terminal.bag_size();
        for leaf in self.leaves() {
            let mut node = leaf;
            loop {
                let bag = &self.tree[node.0];
                if bag.len() <= target {
                    break;
                }
                let mut bag = bag.clone();
                bag.pop_first();
                node = self.push_child(node, bag);
            }
        }
    }

    /// Returns the finished decomposition.
    pub fn finish(self) -> NiceDecomposition<V> {
        NiceDecomposition { tree: self.tree, root: self.root }
    }

    fn leaf_bag(&self, node: BagIndex) -> Result<&Bag<V>, DecompositionError> {
        let bag = self.bag(node).ok_or(DecompositionError::UnknownNode(node))?;
        if !self.is_leaf(node) {
            return Err(DecompositionError::NotALeaf(node));
        }
        Ok(bag)
    }

    fn push_child(&mut self, node: BagIndex, bag: Bag<V>) -> BagIndex {
        let child = self.tree.add_node(bag);
        self.tree.add_edge(node.0, child, ());
        BagIndex(child)
    }
}

/// A rooted tree of bags. Edges point from parents to children.
#[derive(Clone, Debug)]
pub struct NiceDecomposition<V> {
    tree: DiGraph<Bag<V>, ()>,
    root: BagIndex,
}

impl<V: Copy + Ord> NiceDecomposition<V> {
    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.tree.node_count()
    }

    /// Returns the root node.
    pub fn root(&self) -> BagIndex {
        self.root
    }

    /// Returns the bag of `node`.
    pub fn bag(&self, node: BagIndex) -> Option<&Bag<V>> {
        self.tree.node_weight(node.0)
    }

    /// Returns the bags of all nodes.
    pub fn bags(&self) -> HashMap<BagIndex, &Bag<V>> {
        self.tree.node_indices().map(|node| (BagIndex(node), &self.tree[node])).collect()
    }

    /// Return an iterator for the children of a node.
    pub fn children(&self, node: BagIndex) -> impl Iterator<Item = BagIndex> + '_ {
        self.tree.neighbors_directed(node.0, Outgoing).map(BagIndex)
    }

    /// Returns the parent of `node`, or `None` for the root.
    pub fn parent(&self, node: BagIndex) -> Option<BagIndex> {
        self.tree.neighbors_directed(node.0, Incoming).next().map(BagIndex)
    }

    /// Classifies `node` against its children. Returns `None` if the node does not exist or does
    /// not fit any [NodeKind].
    pub fn node_kind(&self, node: BagIndex) -> Option<NodeKind<V>> {
        let bag = self.bag(node)?;
        let children: Vec<_> = self.children(node).collect();
        match children[..] {
            [] => Some(NodeKind::Leaf),
            [child] => {
                let child_bag = &self.tree[child.0];
                if bag.len() == child_bag.len() + 1 && child_bag.is_subset(bag) {
                    bag.difference(child_bag).next().map(|&v| NodeKind::Introduce(v))
                } else if child_bag.len() == bag.len() + 1 && bag.is_subset(child_bag) {
                    child_bag.difference(bag).next().map(|&v| NodeKind::Forget(v))
                } else {
                    None
                }
            }
            [a, b] => (self.tree[a.0] == *bag && self.tree[b.0] == *bag).then_some(NodeKind::Join),
            _ => None,
        }
    }

    /// Returns whether every node fits a [NodeKind].
    pub fn is_nice(&self) -> bool {
        self.tree.node_indices().all(|node| self.node_kind(BagIndex(node)).is_some())
    }

    /// The size of the largest bag minus one. Zero for decompositions with only empty bags.
    pub fn width(&self) -> usize {
        self.tree.node_weights().map(BTreeSet::len).max().unwrap_or(0).saturating_sub(1)
    }

    /// Access the underlying tree.
    pub fn tree(&self) -> &DiGraph<Bag<V>, ()> {
        &self.tree
    }

    /// Convert to [DiGraph].
    pub fn into_digraph(self) -> DiGraph<Bag<V>, ()> {
        self.tree
    }

    /// Checks that this is a tree decomposition of `graph`: every vertex is in some bag, both
    /// end points of every edge share a bag and the nodes holding any one vertex are connected.
    pub fn is_tree_decomposition_of<G>(&self, graph: G) -> bool
    where
        G: NodeCompactIndexable + IntoNeighbors + GraphProp<EdgeType = Undirected> + GraphBase<NodeId = V>,
        V: Hash,
    {
        let mut nodes_of: HashMap<V, Vec<BagIndex>> = HashMap::new();
        for node in self.tree.node_indices() {
            for &v in self.tree[node].iter() {
                nodes_of.entry(v).or_default().push(BagIndex(node));
            }
        }

        for i in 0..graph.node_bound() {
            let u = graph.from_index(i);
            let Some(nodes) = nodes_of.get(&u) else {
                return false;
            };
            for w in graph.neighbors(u) {
                if graph.to_index(w) > i && !nodes.iter().any(|node| self.tree[node.0].contains(&w)) {
                    return false;
                }
            }
            // The nodes holding `u` form a subtree exactly if only one of them has a parent
            // without `u`.
            let tops = nodes
                .iter()
                .filter(|&&node| self.parent(node).map_or(true, |parent| !self.tree[parent.0].contains(&u)))
                .count();
            if tops != 1 {
                return false;
            }
        }
        nodes_of.len() == graph.node_bound()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn introduce_and_forget_require_leaves() {
        let mut builder = DecompositionBuilder::new(Bag::from([1]));
        let root = builder.root();
        let child = builder.add_introduce(2, root).unwrap();
        assert_eq!(builder.add_introduce(3, root), Err(DecompositionError::NotALeaf(root)));
        assert_eq!(builder.add_forget(1, root), Err(DecompositionError::NotALeaf(root)));
        assert_eq!(builder.add_introduce(2, child), Err(DecompositionError::VertexAlreadyInBag(child)));
        assert_eq!(builder.add_forget(3, child), Err(DecompositionError::VertexNotInBag(child)));
        let unknown = BagIndex::new(17);
        assert_eq!(builder.add_forget(1, unknown), Err(DecompositionError::UnknownNode(unknown)));
        assert_eq!(builder.bag(child), Some(&Bag::from([1, 2])));
    }

    #[test]
    fn join_moves_old_children_to_the_right() {
        let mut builder = DecompositionBuilder::new(Bag::from([1, 2]));
        let root = builder.root();
        let old = builder.add_forget(2, root).unwrap();
        let (left, right) = builder.add_join(root).unwrap();
        assert!(builder.is_leaf(left));
        assert!(!builder.is_leaf(right));
        assert_eq!(builder.bag(left), builder.bag(root));
        assert_eq!(builder.bag(right), builder.bag(root));

        let decomposition = builder.finish();
        let mut children: Vec<_> = decomposition.children(root).collect();
        children.sort();
        assert_eq!(children, [left, right]);
        assert_eq!(decomposition.children(right).collect::<Vec<_>>(), [old]);
        assert_eq!(decomposition.parent(old), Some(right));
        assert_eq!(decomposition.node_kind(root), Some(NodeKind::Join));
        assert_eq!(decomposition.node_kind(right), Some(NodeKind::Introduce(2)));
    }

    #[test]
    fn leaf_closure_forgets_smallest_first() {
        let mut builder = DecompositionBuilder::new(Bag::from([3, 1, 2]));
        builder.leaf_closure(Terminal::Singleton);
        let decomposition = builder.finish();
        assert_eq!(decomposition.node_count(), 3);

        let mut node = decomposition.root();
        let mut forgotten = vec![];
        while let Some(child) = decomposition.children(node).next() {
            if let Some(NodeKind::Introduce(v)) = decomposition.node_kind(node) {
                forgotten.push(v);
            }
            node = child;
        }
        assert_eq!(forgotten, [1, 2]);
        assert_eq!(decomposition.bag(node), Some(&Bag::from([3])));
        assert_eq!(decomposition.node_kind(node), Some(NodeKind::Leaf));
    }

    #[test]
    fn width_and_bags() {
        let mut builder = DecompositionBuilder::new(Bag::new());
        let a = builder.add_introduce(5, builder.root()).unwrap();
        builder.add_introduce(6, a).unwrap();
        builder.leaf_closure(Terminal::Empty);
        let decomposition = builder.finish();
        assert_eq!(decomposition.width(), 1);
        assert_eq!(decomposition.bags().len(), decomposition.node_count());
        assert!(decomposition.is_nice());
        assert_eq!(decomposition.into_digraph().node_count(), 5);

        let empty = DecompositionBuilder::<u32>::new(Bag::new()).finish();
        assert_eq!(empty.width(), 0);
        assert_eq!(empty.node_kind(empty.root()), Some(NodeKind::Leaf));
    }

    #[test]
    fn non_nice_nodes_are_detected() {
        let mut tree = DiGraph::new();
        let root = tree.add_node(Bag::from([1, 2]));
        let child = tree.add_node(Bag::from([3]));
        tree.add_edge(root, child, ());
        let decomposition = NiceDecomposition { tree, root: BagIndex(root) };
        assert_eq!(decomposition.node_kind(BagIndex(root)), None);
        assert!(!decomposition.is_nice());
    }
}
