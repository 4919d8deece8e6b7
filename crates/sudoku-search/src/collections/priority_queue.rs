//! Array-backed binary heap with an injected ordering predicate.
//!
//! The predicate alone decides min- versus max-heap behaviour; there is no
//! separate max-heap type. The search frontiers hold `(key, id)` snapshots
//! and compare them with a strict total order, so pop order is fully
//! deterministic.

/// Binary heap over a `Vec`, ordered by a `ranks_before` predicate:
/// `ranks_before(a, b)` is true when `a` must leave the queue before `b`.
pub struct PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    items: Vec<T>,
    ranks_before: F,
}

impl<T: Ord> PriorityQueue<T, fn(&T, &T) -> bool> {
    /// Min-queue on the element's natural order.
    pub fn new_min() -> Self {
        Self::with_predicate(|a, b| a < b)
    }

    /// Max-queue on the element's natural order.
    pub fn new_max() -> Self {
        Self::with_predicate(|a, b| a > b)
    }
}

impl<T, F> PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    /// Build a queue around an ordering predicate.
    pub fn with_predicate(ranks_before: F) -> Self {
        Self {
            items: Vec::new(),
            ranks_before,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Borrow the extremal element without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Insert an element: append, then sift up. O(log n).
    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// Remove and return the extremal element: swap root with the last
    /// element, shrink, sift down. O(log n). `None` when empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let item = self.items.pop();
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        item
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if (self.ranks_before)(&self.items[index], &self.items[parent]) {
                self.items.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut extreme = index;

            if left < len && (self.ranks_before)(&self.items[left], &self.items[extreme]) {
                extreme = left;
            }
            if right < len && (self.ranks_before)(&self.items[right], &self.items[extreme]) {
                extreme = right;
            }
            if extreme == index {
                break;
            }
            self.items.swap(index, extreme);
            index = extreme;
        }
    }
}
