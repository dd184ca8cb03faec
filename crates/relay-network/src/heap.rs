//! Indexable binary min-heap
//!
//! A 0-indexed binary heap (parent = (i-1)/2, children = 2i+1, 2i+2) whose
//! elements may have their keys changed while they are stored. After such an
//! in-place change the heap has to be told which way the element moved:
//!
//! - [`BinaryMinHeap::increase`]: the element's claim on the root increased,
//!   i.e. it now compares *smaller* than before and is bubbled up.
//! - [`BinaryMinHeap::decrease`]: the element's claim on the root decreased,
//!   i.e. it now compares *larger* than before and is sunk down.
//!
//! The names describe the element's priority, not the numeric value of its
//! key. [`BinaryMinHeap::update_key`] applies a mutation and chooses the
//! direction itself, which is what callers should normally use.

use crate::{RelayError, Result};
use std::cmp::Ordering;
use std::fmt;

/// Natural-order comparer used by [`BinaryMinHeap::new`]
pub type NaturalOrder<T> = fn(&T, &T) -> Ordering;

/// Binary min-heap over a caller-supplied total order
pub struct BinaryMinHeap<T, F = NaturalOrder<T>> {
    items: Vec<T>,
    compare: F,
}

impl<T: Ord> BinaryMinHeap<T> {
    pub fn new() -> Self {
        Self::with_comparer(<T as Ord>::cmp)
    }
}

impl<T: Ord> Default for BinaryMinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, F> BinaryMinHeap<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// Create an empty heap ordered by `compare` (smallest on top)
    pub fn with_comparer(compare: F) -> Self {
        Self {
            items: Vec::new(),
            compare,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Top element, or [`RelayError::Empty`]
    pub fn peek(&self) -> Result<&T> {
        self.items.first().ok_or(RelayError::Empty)
    }

    /// Append an item and sift it up. O(log n).
    pub fn add(&mut self, item: T) {
        self.items.push(item);
        let last = self.items.len() - 1;
        self.sift_up(last);
    }

    /// Pop the top element and restore the heap. O(log n).
    pub fn remove(&mut self) -> Result<T> {
        if self.items.is_empty() {
            return Err(RelayError::Empty);
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let top = self.items.pop().ok_or(RelayError::Empty)?;
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        Ok(top)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Raw access for in-place key changes.
    ///
    /// The caller must follow up with [`increase`](Self::increase) or
    /// [`decrease`](Self::decrease) on the same index before any other
    /// heap operation.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Array position of the first element equal to `item`
    pub fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.items.iter().position(|x| x == item)
    }

    /// Array position of the first element matching `predicate`
    pub fn position<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().position(predicate)
    }

    /// The element at `index` was changed in place and now sorts earlier.
    ///
    /// Bubbles it toward the root. Returns its new position.
    pub fn increase(&mut self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        Ok(self.sift_up(index))
    }

    /// The element at `index` was changed in place and now sorts later.
    ///
    /// Sinks it toward the leaves. Returns its new position.
    pub fn decrease(&mut self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        Ok(self.sift_down(index))
    }

    /// Mutate the element at `index` and restore the heap in whichever
    /// direction the new key requires. Returns its new position.
    pub fn update_key<M>(&mut self, index: usize, mutate: M) -> Result<usize>
    where
        M: FnOnce(&mut T),
    {
        self.check_index(index)?;
        mutate(&mut self.items[index]);

        if index > 0 && self.less(index, (index - 1) / 2) {
            Ok(self.sift_up(index))
        } else {
            Ok(self.sift_down(index))
        }
    }

    /// Elements in array (not sorted) order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Check the heap property: no element is greater than its children
    pub fn is_heap(&self) -> bool {
        (1..self.items.len()).all(|i| {
            (self.compare)(&self.items[(i - 1) / 2], &self.items[i]) != Ordering::Greater
        })
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(RelayError::IndexOutOfRange(index, self.items.len()))
        }
    }

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        (self.compare)(&self.items[a], &self.items[b]) == Ordering::Less
    }

    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.less(index, parent) {
                self.items.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
        index
    }

    // Right child only wins when strictly smaller than the left one.
    fn sift_down(&mut self, mut index: usize) -> usize {
        let len = self.items.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }

            if smallest == index {
                return index;
            }

            self.items.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<T: fmt::Debug, F> fmt::Debug for BinaryMinHeap<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryMinHeap")
            .field("items", &self.items)
            .finish()
    }
}
