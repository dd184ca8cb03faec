//! Priority queue over [`BinaryMinHeap`]

use crate::heap::{BinaryMinHeap, NaturalOrder};
use crate::Result;
use std::cmp::Ordering;

/// Queue semantics on top of the indexable heap; lowest key dequeues first
#[derive(Debug)]
pub struct PriorityQueue<T, F = NaturalOrder<T>> {
    heap: BinaryMinHeap<T, F>,
}

impl<T: Ord> PriorityQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryMinHeap::new(),
        }
    }
}

impl<T: Ord> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, F> PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    pub fn with_comparer(compare: F) -> Self {
        Self {
            heap: BinaryMinHeap::with_comparer(compare),
        }
    }

    pub fn enqueue(&mut self, item: T) {
        self.heap.add(item);
    }

    pub fn dequeue(&mut self) -> Result<T> {
        self.heap.remove()
    }

    pub fn peek(&self) -> Result<&T> {
        self.heap.peek()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn count(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn position<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.heap.position(predicate)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.heap.get(index)
    }

    /// See [`BinaryMinHeap::update_key`]
    pub fn update_key<M>(&mut self, index: usize, mutate: M) -> Result<usize>
    where
        M: FnOnce(&mut T),
    {
        self.heap.update_key(index, mutate)
    }

    pub fn heap(&self) -> &BinaryMinHeap<T, F> {
        &self.heap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RelayError;

    #[test]
    fn test_dequeues_in_priority_order() {
        let mut queue = PriorityQueue::new();
        queue.enqueue(30);
        queue.enqueue(10);
        queue.enqueue(20);

        assert_eq!(queue.count(), 3);
        assert_eq!(*queue.peek().unwrap(), 10);
        assert_eq!(queue.dequeue().unwrap(), 10);
        assert_eq!(queue.dequeue().unwrap(), 20);
        assert_eq!(queue.dequeue().unwrap(), 30);
        assert!(matches!(queue.dequeue(), Err(RelayError::Empty)));
    }

    #[test]
    fn test_clear() {
        let mut queue = PriorityQueue::new();
        queue.enqueue("b");
        queue.enqueue("a");
        queue.clear();

        assert!(queue.is_empty());
        assert!(matches!(queue.peek(), Err(RelayError::Empty)));
    }

    #[test]
    fn test_update_key_reorders() {
        let mut queue = PriorityQueue::with_comparer(|a: &(char, f64), b: &(char, f64)| a.1.total_cmp(&b.1));
        queue.enqueue(('a', 1.0));
        queue.enqueue(('b', 2.0));
        queue.enqueue(('c', 3.0));

        let index = queue.position(|e| e.0 == 'c').unwrap();
        queue.update_key(index, |e| e.1 = 0.5).unwrap();

        assert_eq!(queue.dequeue().unwrap().0, 'c');
        assert_eq!(queue.dequeue().unwrap().0, 'a');
        assert!(queue.heap().is_heap());
    }
}
