//! Row items and pages of them.

use std::fmt;
use std::hash::Hash;

/// An identity-bearing row item.
///
/// The toolbar never looks inside an entity. Everything it needs is the
/// identity used for selection membership; filtering, sorting and grouping
/// of local data go through caller-supplied functions.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The identity type. Two entities with equal ids are the same row.
    type Id: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    /// Returns the identity of this row.
    fn id(&self) -> Self::Id;
}

/// One page of rows plus the total-count signal that came with it.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPage<E> {
    /// The materialized rows.
    pub data: Vec<E>,
    /// Total number of rows matching the current predicate.
    pub total_count: usize,
    /// Whether the source truncated the result at a server-side limit.
    pub is_limit_reached: bool,
}

impl<E> DataPage<E> {
    /// Creates a page with the given rows and total count.
    pub fn new(data: Vec<E>, total_count: usize) -> Self {
        Self {
            data,
            total_count,
            is_limit_reached: false,
        }
    }

    /// Creates a page that holds the complete dataset.
    pub fn complete(data: Vec<E>) -> Self {
        let total_count = data.len();
        Self::new(data, total_count)
    }

    /// Creates an empty page.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    /// Marks the page as truncated by the source.
    pub fn with_limit_reached(mut self, reached: bool) -> Self {
        self.is_limit_reached = reached;
        self
    }

    /// Number of rows on this page.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the page holds no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<E> Default for DataPage<E> {
    fn default() -> Self {
        Self::empty()
    }
}
