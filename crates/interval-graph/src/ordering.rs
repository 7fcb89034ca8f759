use std::cmp::Ordering;

use thiserror::Error;

/// A linear order on the vertex indices `0..n`.
///
/// Both directions are stored, so [VertexOrder::rank] and [VertexOrder::element_at] are constant
/// time.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct VertexOrder {
    elements: Vec<usize>,
    ranks: Vec<usize>,
}

/// Errors when constructing a [VertexOrder] from a sequence.
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
pub enum OrderError {
    /// The sequence does not have one entry per vertex.
    #[error("order has {actual} elements, but there are {expected} vertices")]
    WrongLength {
        /// Number of vertices.
        expected: usize,
        /// Length of the sequence.
        actual: usize,
    },
    /// The sequence names a vertex index that does not exist.
    #[error("vertex {0} is out of range")]
    OutOfRange(usize),
    /// The sequence names a vertex twice.
    #[error("vertex {0} appears more than once")]
    Duplicate(usize),
}

impl VertexOrder {
    /// Create an order from a permutation of `0..elements.len()`.
    ///
    /// ```rust
    /// use interval_graph::{OrderError, VertexOrder};
    ///
    /// let order = VertexOrder::from_sequence(vec![2, 0, 1]).unwrap();
    /// assert_eq!(order.rank(2), 0);
    /// assert_eq!(order.element_at(2), 1);
    /// assert_eq!(VertexOrder::from_sequence(vec![0, 0]), Err(OrderError::Duplicate(0)));
    /// ```
    pub fn from_sequence(elements: Vec<usize>) -> Result<Self, OrderError> {
        let n = elements.len();
        Self::with_vertex_count(elements, n)
    }

    /// Create an order over exactly `n` vertices.
    pub fn with_vertex_count(elements: Vec<usize>, n: usize) -> Result<Self, OrderError> {
        if elements.len() != n {
            return Err(OrderError::WrongLength { expected: n, actual: elements.len() });
        }
        let mut ranks = vec![usize::MAX; n];
        for (i, &v) in elements.iter().enumerate() {
            if v >= n {
                return Err(OrderError::OutOfRange(v));
            }
            if ranks[v] != usize::MAX {
                return Err(OrderError::Duplicate(v));
            }
            ranks[v] = i;
        }
        Ok(Self { elements, ranks })
    }

    /// The order `0, 1, ..., n - 1`.
    pub fn identity(n: usize) -> Self {
        Self { elements: (0..n).collect(), ranks: (0..n).collect() }
    }

    /// Used for sequences produced by a complete traversal, which are permutations by
    /// construction.
    pub(crate) fn from_permutation(elements: Vec<usize>) -> Self {
        let mut ranks = vec![usize::MAX; elements.len()];
        for (i, &v) in elements.iter().enumerate() {
            ranks[v] = i;
        }
        debug_assert!(ranks.iter().all(|&r| r != usize::MAX));
        Self { elements, ranks }
    }

    /// Returns the position of `v`.
    #[inline(always)]
    pub fn rank(&self, v: usize) -> usize {
        self.ranks[v]
    }

    /// Returns the vertex at position `i`.
    #[inline(always)]
    pub fn element_at(&self, i: usize) -> usize {
        self.elements[i]
    }

    /// Returns the number of vertices.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the order is over no vertices.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the vertex at position `0`.
    pub fn first(&self) -> Option<usize> {
        self.elements.first().copied()
    }

    /// Returns the vertex at the last position.
    pub fn last(&self) -> Option<usize> {
        self.elements.last().copied()
    }

    /// Iterates over the vertices from position `0` upwards.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = usize> + ExactSizeIterator + '_ {
        self.elements.iter().copied()
    }

    /// Compares two vertices by their positions.
    pub fn compare(&self, a: usize, b: usize) -> Ordering {
        self.rank(a).cmp(&self.rank(b))
    }

    /// The same vertices in the opposite order.
    pub fn reversed(&self) -> Self {
        let n = self.len();
        let elements = self.elements.iter().rev().copied().collect();
        let ranks = self.ranks.iter().map(|&r| n - 1 - r).collect();
        Self { elements, ranks }
    }

    /// Returns the vertices in order.
    pub fn as_slice(&self) -> &[usize] {
        &self.elements
    }

    /// Returns the vertices in order.
    pub fn into_vec(self) -> Vec<usize> {
        self.elements
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validation() {
        assert_eq!(
            VertexOrder::with_vertex_count(vec![0, 1], 3),
            Err(OrderError::WrongLength { expected: 3, actual: 2 })
        );
        assert_eq!(VertexOrder::from_sequence(vec![0, 3, 1]), Err(OrderError::OutOfRange(3)));
        assert_eq!(VertexOrder::from_sequence(vec![1, 0, 1]), Err(OrderError::Duplicate(1)));
        assert!(VertexOrder::from_sequence(vec![]).unwrap().is_empty());
    }

    #[test]
    fn rank_and_element_are_inverse() {
        let order = VertexOrder::from_sequence(vec![3, 1, 4, 0, 2]).unwrap();
        for i in 0..order.len() {
            assert_eq!(order.rank(order.element_at(i)), i);
        }
        assert_eq!(order.first(), Some(3));
        assert_eq!(order.last(), Some(2));
        assert_eq!(order.compare(1, 0), Ordering::Less);
        assert_eq!(order.compare(2, 4), Ordering::Greater);
        assert_eq!(order.compare(2, 2), Ordering::Equal);
    }

    #[test]
    fn reversed() {
        let order = VertexOrder::from_sequence(vec![3, 1, 4, 0, 2]).unwrap();
        let reversed = order.reversed();
        assert_eq!(reversed.as_slice(), [2, 0, 4, 1, 3]);
        assert_eq!(reversed, VertexOrder::from_sequence(vec![2, 0, 4, 1, 3]).unwrap());
        assert_eq!(VertexOrder::identity(3).into_vec(), [0, 1, 2]);
    }
}
