use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};

use crate::index::make_index;
use crate::interval::Interval;

make_index!(TreeIndex);

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Color {
    Red,
    Black,
}

#[derive(Clone, Debug)]
struct Node<T> {
    interval: Interval<T>,
    /// Maximum end point in the subtree rooted at this node.
    high: T,
    color: Color,
    parent: TreeIndex,
    left: TreeIndex,
    right: TreeIndex,
}

/// A set of closed intervals that answers overlap queries.
///
/// The intervals are kept in a red-black tree ordered by `(start, end)`. Every node is augmented
/// with the maximum end point of its subtree, which allows pruning whole subtrees during a query.
/// Nodes live in an arena and are linked by indices.
///
/// ```rust
/// use interval_graph::{Interval, IntervalTree};
///
/// let mut tree = IntervalTree::new();
/// tree.insert(Interval::new(1, 3).unwrap());
/// tree.insert(Interval::new(5, 8).unwrap());
/// tree.insert(Interval::new(2, 6).unwrap());
///
/// let query = Interval::new(3, 4).unwrap();
/// let hits: Vec<_> = tree.overlapping(&query).into_iter().copied().collect();
/// assert_eq!(hits, [Interval::new(1, 3).unwrap(), Interval::new(2, 6).unwrap()]);
/// ```
#[derive(Clone)]
pub struct IntervalTree<T> {
    nodes: Vec<Node<T>>,
    free: Vec<TreeIndex>,
    root: TreeIndex,
    len: usize,
}

impl<T: Ord + Copy> Default for IntervalTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Copy + Debug> Debug for IntervalTree<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord + Copy> IntervalTree<T> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self { nodes: vec![], free: vec![], root: TreeIndex::nil(), len: 0 }
    }

    /// Returns the number of stored intervals.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no interval is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns whether `interval` is stored.
    pub fn contains(&self, interval: &Interval<T>) -> bool {
        !self.find(interval).is_nil()
    }

    /// Insert an interval. Returns `false` and leaves the tree unchanged if an equal interval is
    /// already stored.
    pub fn insert(&mut self, interval: Interval<T>) -> bool {
        let mut parent = TreeIndex::nil();
        let mut current = self.root;
        let mut goes_left = false;
        while !current.is_nil() {
            parent = current;
            match interval.cmp(&self.node(current).interval) {
                Ordering::Less => {
                    goes_left = true;
                    current = self.node(current).left;
                }
                Ordering::Greater => {
                    goes_left = false;
                    current = self.node(current).right;
                }
                Ordering::Equal => return false,
            }
        }

        let z = self.allocate(Node {
            interval,
            high: *interval.end(),
            color: Color::Red,
            parent,
            left: TreeIndex::nil(),
            right: TreeIndex::nil(),
        });
        if parent.is_nil() {
            self.root = z;
        } else if goes_left {
            self.node_mut(parent).left = z;
        } else {
            self.node_mut(parent).right = z;
        }
        self.update_upwards(parent);
        self.insert_fixup(z);
        self.len += 1;
        true
    }

    /// Remove an interval. Returns `false` if it was not stored.
    pub fn remove(&mut self, interval: &Interval<T>) -> bool {
        let z = self.find(interval);
        if z.is_nil() {
            return false;
        }
        self.delete(z);
        self.len -= 1;
        true
    }

    /// Returns all stored intervals that intersect `query`, in ascending `(start, end)` order.
    pub fn overlapping(&self, query: &Interval<T>) -> Vec<&Interval<T>> {
        let mut result = vec![];
        self.collect_overlapping(self.root, query, &mut result);
        result
    }

    /// Returns all stored intervals that contain `point`, in ascending `(start, end)` order.
    pub fn overlapping_point(&self, point: T) -> Vec<&Interval<T>> {
        self.overlapping(&Interval::point(point))
    }

    /// Iterates over the stored intervals in ascending `(start, end)` order.
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter { tree: self, stack: vec![] };
        iter.push_left_spine(self.root);
        iter
    }

    fn collect_overlapping<'a>(&'a self, x: TreeIndex, query: &Interval<T>, out: &mut Vec<&'a Interval<T>>) {
        if x.is_nil() {
            return;
        }
        let node = self.node(x);
        if node.high < *query.start() {
            return;
        }
        self.collect_overlapping(node.left, query, out);
        if node.interval.intersects(query) {
            out.push(&node.interval);
        }
        if node.interval.start() <= query.end() {
            self.collect_overlapping(node.right, query, out);
        }
    }

    fn find(&self, interval: &Interval<T>) -> TreeIndex {
        let mut current = self.root;
        while !current.is_nil() {
            let node = self.node(current);
            current = match interval.cmp(&node.interval) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return current,
            };
        }
        current
    }

    fn allocate(&mut self, node: Node<T>) -> TreeIndex {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx.index()] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                TreeIndex::new(self.nodes.len() - 1)
            }
        }
    }

    #[inline(always)]
    fn node(&self, x: TreeIndex) -> &Node<T> {
        &self.nodes[x.index()]
    }

    #[inline(always)]
    fn node_mut(&mut self, x: TreeIndex) -> &mut Node<T> {
        &mut self.nodes[x.index()]
    }

    #[inline(always)]
    fn parent(&self, x: TreeIndex) -> TreeIndex {
        self.node(x).parent
    }

    #[inline(always)]
    fn left(&self, x: TreeIndex) -> TreeIndex {
        self.node(x).left
    }

    #[inline(always)]
    fn right(&self, x: TreeIndex) -> TreeIndex {
        self.node(x).right
    }

    /// Nil links are black.
    #[inline(always)]
    fn color(&self, x: TreeIndex) -> Color {
        if x.is_nil() {
            Color::Black
        } else {
            self.node(x).color
        }
    }

    #[inline(always)]
    fn set_color(&mut self, x: TreeIndex, color: Color) {
        if !x.is_nil() {
            self.node_mut(x).color = color;
        }
    }

    fn update_high(&mut self, x: TreeIndex) {
        let node = self.node(x);
        let mut high = *node.interval.end();
        for child in [node.left, node.right] {
            if !child.is_nil() {
                high = high.max(self.node(child).high);
            }
        }
        self.node_mut(x).high = high;
    }

    fn update_upwards(&mut self, mut x: TreeIndex) {
        while !x.is_nil() {
            self.update_high(x);
            x = self.parent(x);
        }
    }

    fn rotate_left(&mut self, x: TreeIndex) {
        let y = self.right(x);
        let y_left = self.left(y);
        self.node_mut(x).right = y_left;
        if !y_left.is_nil() {
            self.node_mut(y_left).parent = x;
        }
        self.replace_in_parent(x, y);
        self.node_mut(y).left = x;
        self.node_mut(x).parent = y;
        self.update_high(x);
        self.update_high(y);
    }

    fn rotate_right(&mut self, x: TreeIndex) {
        let y = self.left(x);
        let y_right = self.right(y);
        self.node_mut(x).left = y_right;
        if !y_right.is_nil() {
            self.node_mut(y_right).parent = x;
        }
        self.replace_in_parent(x, y);
        self.node_mut(y).right = x;
        self.node_mut(x).parent = y;
        self.update_high(x);
        self.update_high(y);
    }

    /// Puts `v` at the position of `u` in `u`'s parent. `v` may be nil.
    fn replace_in_parent(&mut self, u: TreeIndex, v: TreeIndex) {
        let parent = self.parent(u);
        if parent.is_nil() {
            self.root = v;
        } else if self.left(parent) == u {
            self.node_mut(parent).left = v;
        } else {
            self.node_mut(parent).right = v;
        }
        if !v.is_nil() {
            self.node_mut(v).parent = parent;
        }
    }

    fn insert_fixup(&mut self, mut z: TreeIndex) {
        while self.color(self.parent(z)) == Color::Red {
            let p = self.parent(z);
            // A red node is never the root, so the grandparent exists.
            let g = self.parent(p);
            if p == self.left(g) {
                let uncle = self.right(g);
                if self.color(uncle) == Color::Red {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(g, Color::Red);
                    z = g;
                } else {
                    if z == self.right(p) {
                        z = p;
                        self.rotate_left(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate_right(g);
                }
            } else {
                let uncle = self.left(g);
                if self.color(uncle) == Color::Red {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(g, Color::Red);
                    z = g;
                } else {
                    if z == self.left(p) {
                        z = p;
                        self.rotate_right(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate_left(g);
                }
            }
        }
        let root = self.root;
        self.set_color(root, Color::Black);
    }

    fn minimum(&self, mut x: TreeIndex) -> TreeIndex {
        while !self.left(x).is_nil() {
            x = self.left(x);
        }
        x
    }

    fn delete(&mut self, z: TreeIndex) {
        let z_left = self.left(z);
        let z_right = self.right(z);

        // `x` takes the place of the removed node and may be nil, so its parent is tracked
        // separately.
        let (x, x_parent, removed_color) = if z_left.is_nil() {
            let x_parent = self.parent(z);
            self.replace_in_parent(z, z_right);
            (z_right, x_parent, self.color(z))
        } else if z_right.is_nil() {
            let x_parent = self.parent(z);
            self.replace_in_parent(z, z_left);
            (z_left, x_parent, self.color(z))
        } else {
            let y = self.minimum(z_right);
            let removed_color = self.color(y);
            let x = self.right(y);
            let x_parent = if self.parent(y) == z {
                y
            } else {
                let x_parent = self.parent(y);
                self.replace_in_parent(y, x);
                self.node_mut(y).right = z_right;
                self.node_mut(z_right).parent = y;
                x_parent
            };
            self.replace_in_parent(z, y);
            self.node_mut(y).left = z_left;
            self.node_mut(z_left).parent = y;
            let z_color = self.color(z);
            self.set_color(y, z_color);
            (x, x_parent, removed_color)
        };

        self.update_upwards(x_parent);
        if removed_color == Color::Black {
            self.delete_fixup(x, x_parent);
        }

        let node = self.node_mut(z);
        node.parent = TreeIndex::nil();
        node.left = TreeIndex::nil();
        node.right = TreeIndex::nil();
        self.free.push(z);
    }

    fn delete_fixup(&mut self, mut x: TreeIndex, mut parent: TreeIndex) {
        while x != self.root && self.color(x) == Color::Black {
            if parent.is_nil() {
                break;
            }
            if x == self.left(parent) {
                let mut w = self.right(parent);
                if self.color(w) == Color::Red {
                    self.set_color(w, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_left(parent);
                    w = self.right(parent);
                }
                if self.color(self.left(w)) == Color::Black && self.color(self.right(w)) == Color::Black {
                    self.set_color(w, Color::Red);
                    x = parent;
                    parent = self.parent(x);
                } else {
                    if self.color(self.right(w)) == Color::Black {
                        let w_left = self.left(w);
                        self.set_color(w_left, Color::Black);
                        self.set_color(w, Color::Red);
                        self.rotate_right(w);
                        w = self.right(parent);
                    }
                    let parent_color = self.color(parent);
                    self.set_color(w, parent_color);
                    self.set_color(parent, Color::Black);
                    let w_right = self.right(w);
                    self.set_color(w_right, Color::Black);
                    self.rotate_left(parent);
                    x = self.root;
                    parent = TreeIndex::nil();
                }
            } else {
                let mut w = self.left(parent);
                if self.color(w) == Color::Red {
                    self.set_color(w, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_right(parent);
                    w = self.left(parent);
                }
                if self.color(self.left(w)) == Color::Black && self.color(self.right(w)) == Color::Black {
                    self.set_color(w, Color::Red);
                    x = parent;
                    parent = self.parent(x);
                } else {
                    if self.color(self.left(w)) == Color::Black {
                        let w_right = self.right(w);
                        self.set_color(w_right, Color::Black);
                        self.set_color(w, Color::Red);
                        self.rotate_left(w);
                        w = self.left(parent);
                    }
                    let parent_color = self.color(parent);
                    self.set_color(w, parent_color);
                    self.set_color(parent, Color::Black);
                    let w_left = self.left(w);
                    self.set_color(w_left, Color::Black);
                    self.rotate_right(parent);
                    x = self.root;
                    parent = TreeIndex::nil();
                }
            }
        }
        self.set_color(x, Color::Black);
    }
}

/// In-order iterator over an [IntervalTree].
pub struct Iter<'a, T> {
    tree: &'a IntervalTree<T>,
    stack: Vec<TreeIndex>,
}

impl<'a, T> Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Iter").field("stack", &self.stack).finish()
    }
}

impl<'a, T> Iter<'a, T> {
    fn push_left_spine(&mut self, mut x: TreeIndex) {
        while !x.is_nil() {
            self.stack.push(x);
            x = self.tree.nodes[x.index()].left;
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a Interval<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let x = self.stack.pop()?;
        let node = &self.tree.nodes[x.index()];
        self.push_left_spine(node.right);
        Some(&node.interval)
    }
}

impl<'a, T: Ord + Copy> IntoIterator for &'a IntervalTree<T> {
    type Item = &'a Interval<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Ord + Copy> Extend<Interval<T>> for IntervalTree<T> {
    fn extend<I: IntoIterator<Item = Interval<T>>>(&mut self, iter: I) {
        for interval in iter {
            self.insert(interval);
        }
    }
}

impl<T: Ord + Copy> FromIterator<Interval<T>> for IntervalTree<T> {
    fn from_iter<I: IntoIterator<Item = Interval<T>>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

#[cfg(test)]
impl<T: Ord + Copy + Debug> IntervalTree<T> {
    /// Checks the red-black, search tree and augmentation invariants.
    pub(crate) fn assert_invariants(&self) {
        assert_eq!(self.color(self.root), Color::Black);
        if !self.root.is_nil() {
            assert!(self.parent(self.root).is_nil());
        }
        let (count, _) = self.check_subtree(self.root);
        assert_eq!(count, self.len);
    }

    /// Returns the number of nodes and the black height of the subtree.
    fn check_subtree(&self, x: TreeIndex) -> (usize, usize) {
        if x.is_nil() {
            return (0, 1);
        }
        let node = self.node(x);
        let mut high = *node.interval.end();
        for child in [node.left, node.right] {
            if child.is_nil() {
                continue;
            }
            assert_eq!(self.parent(child), x);
            high = high.max(self.node(child).high);
            if node.color == Color::Red {
                assert_eq!(self.node(child).color, Color::Black, "red node {:?} has a red child", node.interval);
            }
        }
        if !node.left.is_nil() {
            assert!(self.node(node.left).interval < node.interval);
        }
        if !node.right.is_nil() {
            assert!(self.node(node.right).interval > node.interval);
        }
        assert_eq!(node.high, high);
        let (left_count, left_height) = self.check_subtree(node.left);
        let (right_count, right_height) = self.check_subtree(node.right);
        assert_eq!(left_height, right_height);
        let height = left_height + usize::from(node.color == Color::Black);
        (left_count + right_count + 1, height)
    }
}
