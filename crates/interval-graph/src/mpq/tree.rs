use std::ops::{Index, IndexMut};

use crate::index::make_index;
use crate::interval::Interval;

make_index!(pub(crate) MpqNode);

#[derive(Clone, Debug)]
pub(crate) enum Shape {
    Leaf,
    /// Children in any order.
    P(Vec<MpqNode>),
    /// Sections from left to right. The order is fixed up to reversal.
    Q(Vec<MpqNode>),
    /// A section of a Q-node with the subtree below it.
    Section(MpqNode),
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) shape: Shape,
    pub(crate) parent: MpqNode,
    pub(crate) members: Vec<usize>,
    pub(crate) mark: u32,
}

/// Nodes of a modified PQ-tree, together with the nodes every vertex is assigned to. A vertex
/// belongs to a single leaf or P-node, or to consecutive sections of one Q-node.
///
/// The clique of a leaf are the members of all nodes and sections on the path from the root.
#[derive(Clone, Debug)]
pub(crate) struct Arena {
    nodes: Vec<Node>,
    free: Vec<MpqNode>,
    owners: Vec<Vec<MpqNode>>,
    pub(crate) root: MpqNode,
}

impl Index<MpqNode> for Arena {
    type Output = Node;

    fn index(&self, index: MpqNode) -> &Self::Output {
        &self.nodes[index.index()]
    }
}

impl IndexMut<MpqNode> for Arena {
    fn index_mut(&mut self, index: MpqNode) -> &mut Self::Output {
        &mut self.nodes[index.index()]
    }
}

impl Arena {
    pub(crate) fn new(vertex_count: usize) -> Self {
        Self { nodes: vec![], free: vec![], owners: vec![vec![]; vertex_count], root: MpqNode::nil() }
    }

    /// Number of live nodes, sections included.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub(crate) fn alloc(&mut self, shape: Shape, members: Vec<usize>) -> MpqNode {
        let node = Node { shape, parent: MpqNode::nil(), members, mark: 0 };
        let index = match self.free.pop() {
            Some(index) => {
                self[index] = node;
                index
            }
            None => {
                self.nodes.push(node);
                MpqNode::new(self.nodes.len() - 1)
            }
        };
        let Self { nodes, owners, .. } = self;
        for &v in &nodes[index.index()].members {
            owners[v].push(index);
        }
        for child in self.children(index) {
            self[child].parent = index;
        }
        index
    }

    /// Frees `node`. Its children are left untouched.
    pub(crate) fn release(&mut self, node: MpqNode) {
        let members = std::mem::take(&mut self[node].members);
        for v in members {
            self.owners[v].retain(|&owner| owner != node);
        }
        self[node].shape = Shape::Leaf;
        self[node].parent = MpqNode::nil();
        self.free.push(node);
    }

    pub(crate) fn members(&self, node: MpqNode) -> &[usize] {
        &self[node].members
    }

    pub(crate) fn owns(&self, v: usize, node: MpqNode) -> bool {
        self.owners[v].contains(&node)
    }

    pub(crate) fn owners(&self, v: usize) -> &[MpqNode] {
        &self.owners[v]
    }

    pub(crate) fn add_member(&mut self, node: MpqNode, v: usize) {
        self[node].members.push(v);
        self.owners[v].push(node);
    }

    /// Removes and returns the members matching `pred`.
    pub(crate) fn take_members(&mut self, node: MpqNode, mut pred: impl FnMut(usize) -> bool) -> Vec<usize> {
        let (taken, kept): (Vec<usize>, Vec<usize>) = self[node].members.iter().copied().partition(|&v| pred(v));
        self[node].members = kept;
        for &v in &taken {
            self.owners[v].retain(|&owner| owner != node);
        }
        taken
    }

    pub(crate) fn is_q(&self, node: MpqNode) -> bool {
        matches!(self[node].shape, Shape::Q(_))
    }

    pub(crate) fn children(&self, node: MpqNode) -> Vec<MpqNode> {
        match &self[node].shape {
            Shape::Leaf => vec![],
            Shape::P(children) | Shape::Q(children) => children.clone(),
            Shape::Section(child) => vec![*child],
        }
    }

    pub(crate) fn sections(&self, node: MpqNode) -> &[MpqNode] {
        match &self[node].shape {
            Shape::Q(sections) => sections,
            _ => &[],
        }
    }

    pub(crate) fn child(&self, section: MpqNode) -> MpqNode {
        match self[section].shape {
            Shape::Section(child) => child,
            _ => MpqNode::nil(),
        }
    }

    pub(crate) fn set_shape(&mut self, node: MpqNode, shape: Shape) {
        self[node].shape = shape;
        for child in self.children(node) {
            self[child].parent = node;
        }
    }

    pub(crate) fn push_child(&mut self, node: MpqNode, child: MpqNode) {
        if let Shape::P(children) = &mut self[node].shape {
            children.push(child);
        }
        self[child].parent = node;
    }

    /// Puts `new` in the place of `old` below `parent`. A nil `parent` replaces the root.
    pub(crate) fn replace_child(&mut self, parent: MpqNode, old: MpqNode, new: MpqNode) {
        if parent.is_nil() {
            self.root = new;
        } else {
            match &mut self[parent].shape {
                Shape::P(children) | Shape::Q(children) => {
                    for child in children.iter_mut().filter(|child| **child == old) {
                        *child = new;
                    }
                }
                Shape::Section(child) => *child = new,
                Shape::Leaf => {}
            }
        }
        self[new].parent = parent;
    }

    /// The cliques of the leaves in frontier order, each sorted.
    pub(crate) fn cliques(&self) -> Vec<Vec<usize>> {
        let mut cliques = vec![];
        if !self.root.is_nil() {
            self.collect_cliques(self.root, &mut vec![], &mut cliques);
        }
        cliques
    }

    /// The positions of the first and the last clique of every vertex.
    pub(crate) fn spans(&self) -> Vec<Option<(usize, usize)>> {
        let mut spans: Vec<Option<(usize, usize)>> = vec![None; self.owners.len()];
        for (position, clique) in self.cliques().into_iter().enumerate() {
            for v in clique {
                let entry = spans[v].get_or_insert((position, position));
                entry.1 = position;
            }
        }
        spans
    }

    fn collect_cliques(&self, node: MpqNode, path: &mut Vec<usize>, cliques: &mut Vec<Vec<usize>>) {
        let len = path.len();
        path.extend(&self[node].members);
        match &self[node].shape {
            Shape::Leaf => {
                let mut clique = path.clone();
                clique.sort_unstable();
                cliques.push(clique);
            }
            Shape::P(children) | Shape::Q(children) => {
                for &child in children {
                    self.collect_cliques(child, path, cliques);
                }
            }
            Shape::Section(child) => self.collect_cliques(*child, path, cliques),
        }
        path.truncate(len);
    }

    /// Renders the tree with compact vertex indices, `{..}` for leaves, `P{..}[..]` for P-nodes
    /// and `Q[{..}: .., ..]` for Q-nodes.
    #[cfg(test)]
    pub(crate) fn render(&self) -> String {
        if self.root.is_nil() {
            return String::new();
        }
        let mut out = String::new();
        self.render_node(self.root, &mut out);
        out
    }

    #[cfg(test)]
    fn render_node(&self, node: MpqNode, out: &mut String) {
        let mut members = self[node].members.clone();
        members.sort_unstable();
        let members =
            format!("{{{}}}", members.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "));
        let nested = |out: &mut String, children: &[MpqNode]| {
            for (i, &child) in children.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                self.render_node(child, out);
            }
        };
        match &self[node].shape {
            Shape::Leaf => out.push_str(&members),
            Shape::P(children) => {
                out.push('P');
                out.push_str(&members);
                out.push('[');
                nested(out, children);
                out.push(']');
            }
            Shape::Q(sections) => {
                out.push_str("Q[");
                nested(out, sections);
                out.push(']');
            }
            Shape::Section(child) => {
                out.push_str(&members);
                out.push_str(": ");
                self.render_node(*child, out);
            }
        }
    }
}

/// A modified PQ-tree of an interval graph. Its leaves are the maximal cliques, and every order
/// of the leaves it allows lists the cliques of every vertex consecutively.
#[derive(Clone, Debug)]
pub struct MpqTree<V> {
    arena: Arena,
    vertices: Vec<V>,
}

impl<V: Copy> MpqTree<V> {
    pub(crate) fn new(arena: Arena, vertices: Vec<V>) -> Self {
        Self { arena, vertices }
    }

    /// Returns the number of nodes, counting every section of a Q-node as a node.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Returns the maximal cliques in the order of the leaves.
    pub fn cliques(&self) -> Vec<Vec<V>> {
        self.arena
            .cliques()
            .into_iter()
            .map(|clique| clique.into_iter().map(|v| self.vertices[v]).collect())
            .collect()
    }

    /// Returns an interval model. Every vertex is assigned the positions of the first and the
    /// last clique containing it.
    pub fn intervals(&self) -> Vec<(V, Interval<usize>)> {
        self.arena
            .spans()
            .into_iter()
            .enumerate()
            .filter_map(|(v, span)| {
                let (first, last) = span?;
                let interval = Interval::new(first, last).expect("cliques are visited in order");
                Some((self.vertices[v], interval))
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn render(&self) -> String {
        self.arena.render()
    }
}
