use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use thiserror::Error;

/// A closed interval `[start, end]` with `start <= end`.
///
/// The derived order is lexicographic on `(start, end)`. It is the total order used as the key of
/// an [IntervalTree](crate::IntervalTree). [Interval::overlap_cmp] is a separate, non-total
/// comparison that treats intersecting intervals as equal.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Interval<T> {
    start: T,
    end: T,
}

/// Errors when constructing an [Interval].
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
pub enum IntervalError {
    /// The start of the interval lies after its end.
    #[error("interval start lies after its end")]
    InvalidBounds,
}

impl<T: Ord> Interval<T> {
    /// Create the interval `[start, end]`.
    ///
    /// ```rust
    /// use interval_graph::{Interval, IntervalError};
    ///
    /// assert!(Interval::new(1, 3).is_ok());
    /// assert_eq!(Interval::new(3, 1), Err(IntervalError::InvalidBounds));
    /// ```
    pub fn new(start: T, end: T) -> Result<Self, IntervalError> {
        if start > end {
            return Err(IntervalError::InvalidBounds);
        }
        Ok(Self { start, end })
    }

    /// The interval `[point, point]`.
    pub fn point(point: T) -> Self
    where
        T: Clone,
    {
        Self { start: point.clone(), end: point }
    }

    /// Returns the start of the interval.
    #[inline(always)]
    pub fn start(&self) -> &T {
        &self.start
    }

    /// Returns the end of the interval.
    #[inline(always)]
    pub fn end(&self) -> &T {
        &self.end
    }

    /// Returns `(start, end)`.
    pub fn into_bounds(self) -> (T, T) {
        (self.start, self.end)
    }

    /// Returns whether `start <= point <= end`.
    pub fn contains(&self, point: &T) -> bool {
        &self.start <= point && point <= &self.end
    }

    /// Returns whether the two closed intervals share at least one point. Touching endpoints
    /// count as an intersection.
    pub fn intersects(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Compares by position, treating intersecting intervals as equal.
    ///
    /// Returns `Less` if `self` lies entirely before `other`, `Greater` if it lies entirely after
    /// it and `Equal` otherwise. This is not a total order and must not be used for sorting.
    pub fn overlap_cmp(&self, other: &Self) -> Ordering {
        if self.end < other.start {
            Ordering::Less
        } else if other.end < self.start {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Orders by start point, breaking ties by end point.
    pub fn cmp_by_start(a: &Self, b: &Self) -> Ordering {
        a.start.cmp(&b.start).then_with(|| a.end.cmp(&b.end))
    }

    /// Orders by end point, breaking ties by start point.
    pub fn cmp_by_end(a: &Self, b: &Self) -> Ordering {
        a.end.cmp(&b.end).then_with(|| a.start.cmp(&b.start))
    }
}

impl<T: Display> Display for Interval<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
