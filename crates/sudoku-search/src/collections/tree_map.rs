//! Ordered key→value map backed by a left-leaning red-black tree.
//!
//! Backs the graph's vertex/edge registries and every adjacency list, so the
//! red-black invariants are load-bearing for the whole search engine: they
//! are asserted after every mutation in the test suite.
//!
//! Lookup is strict (`get` on a missing key is `None`, never an insert) and
//! `insert` is first-write-wins: a key that is already present keeps its
//! stored value.

use std::cmp::Ordering;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

type Link<K, V> = Option<Box<Node<K, V>>>;

struct Node<K, V> {
    key: K,
    value: V,
    color: Color,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            color: Color::Red,
            left: None,
            right: None,
        })
    }
}

fn is_red<K, V>(link: &Link<K, V>) -> bool {
    matches!(link, Some(node) if node.color == Color::Red)
}

/// Ordered map with O(log n) insert/lookup/remove and ascending-key
/// iteration.
pub struct TreeMap<K, V> {
    root: Link<K, V>,
    len: usize,
}

impl<K: Ord, V> Default for TreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> TreeMap<K, V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Insert `value` under `key`. If the key is already present the stored
    /// value is left unchanged and `false` is returned.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let (root, inserted) = Self::insert_node(self.root.take(), key, value);
        self.root = Some(root);
        if let Some(root) = self.root.as_mut() {
            root.color = Color::Black;
        }
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Borrow the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut current = &self.root;
        while let Some(node) = current {
            match key.cmp(&node.key) {
                Ordering::Less => current = &node.left,
                Ordering::Greater => current = &node.right,
                Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    /// Mutably borrow the value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut current = &mut self.root;
        while let Some(node) = current {
            match key.cmp(&node.key) {
                Ordering::Less => current = &mut node.left,
                Ordering::Greater => current = &mut node.right,
                Ordering::Equal => return Some(&mut node.value),
            }
        }
        None
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Remove the entry under `key`, returning its value. Absent keys are a
    /// no-op returning `None`.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        if !self.contains(key) {
            return None;
        }

        if let Some(root) = self.root.as_mut() {
            if !is_red(&root.left) && !is_red(&root.right) {
                root.color = Color::Red;
            }
        }

        let root = self.root.take().expect("non-empty after contains check");
        let (root, removed) = Self::remove_node(root, key);
        self.root = root;
        if let Some(root) = self.root.as_mut() {
            root.color = Color::Black;
        }
        self.len -= 1;
        removed
    }

    /// In-order iterator over `(key, value)` pairs, ascending by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left(&self.root);
        iter
    }

    /// Ascending iterator over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    // ==================== Rebalancing primitives ====================

    fn rotate_left(mut h: Box<Node<K, V>>) -> Box<Node<K, V>> {
        let mut x = h.right.take().expect("rotate_left requires a right child");
        h.right = x.left.take();
        x.color = h.color;
        h.color = Color::Red;
        x.left = Some(h);
        x
    }

    fn rotate_right(mut h: Box<Node<K, V>>) -> Box<Node<K, V>> {
        let mut x = h.left.take().expect("rotate_right requires a left child");
        h.left = x.right.take();
        x.color = h.color;
        h.color = Color::Red;
        x.right = Some(h);
        x
    }

    fn flip_colors(h: &mut Box<Node<K, V>>) {
        fn flip(color: Color) -> Color {
            match color {
                Color::Red => Color::Black,
                Color::Black => Color::Red,
            }
        }
        h.color = flip(h.color);
        if let Some(left) = h.left.as_mut() {
            left.color = flip(left.color);
        }
        if let Some(right) = h.right.as_mut() {
            right.color = flip(right.color);
        }
    }

    /// Restore the left-leaning invariants on the way back up.
    fn fix_up(mut h: Box<Node<K, V>>) -> Box<Node<K, V>> {
        if is_red(&h.right) && !is_red(&h.left) {
            h = Self::rotate_left(h);
        }
        if is_red(&h.left) && h.left.as_ref().map_or(false, |l| is_red(&l.left)) {
            h = Self::rotate_right(h);
        }
        if is_red(&h.left) && is_red(&h.right) {
            Self::flip_colors(&mut h);
        }
        h
    }

    fn move_red_left(mut h: Box<Node<K, V>>) -> Box<Node<K, V>> {
        Self::flip_colors(&mut h);
        if h.right.as_ref().map_or(false, |r| is_red(&r.left)) {
            let right = h.right.take().expect("checked above");
            h.right = Some(Self::rotate_right(right));
            h = Self::rotate_left(h);
            Self::flip_colors(&mut h);
        }
        h
    }

    fn move_red_right(mut h: Box<Node<K, V>>) -> Box<Node<K, V>> {
        Self::flip_colors(&mut h);
        if h.left.as_ref().map_or(false, |l| is_red(&l.left)) {
            h = Self::rotate_right(h);
            Self::flip_colors(&mut h);
        }
        h
    }

    fn insert_node(link: Link<K, V>, key: K, value: V) -> (Box<Node<K, V>>, bool) {
        let mut h = match link {
            None => return (Node::new(key, value), true),
            Some(h) => h,
        };

        let inserted = match key.cmp(&h.key) {
            Ordering::Less => {
                let (left, inserted) = Self::insert_node(h.left.take(), key, value);
                h.left = Some(left);
                inserted
            }
            Ordering::Greater => {
                let (right, inserted) = Self::insert_node(h.right.take(), key, value);
                h.right = Some(right);
                inserted
            }
            // First write wins: the present entry is kept unchanged.
            Ordering::Equal => false,
        };

        (Self::fix_up(h), inserted)
    }

    /// Detach the minimum node of the subtree, returning the rebalanced
    /// remainder and the extracted node.
    fn delete_min(mut h: Box<Node<K, V>>) -> (Link<K, V>, Box<Node<K, V>>) {
        if h.left.is_none() {
            return (None, h);
        }
        if !is_red(&h.left) && !h.left.as_ref().map_or(false, |l| is_red(&l.left)) {
            h = Self::move_red_left(h);
        }
        let left = h.left.take().expect("left child survives move_red_left");
        let (left, min) = Self::delete_min(left);
        h.left = left;
        (Some(Self::fix_up(h)), min)
    }

    fn remove_node(mut h: Box<Node<K, V>>, key: &K) -> (Link<K, V>, Option<V>) {
        let removed;

        if key < &h.key {
            if !is_red(&h.left) && !h.left.as_ref().map_or(false, |l| is_red(&l.left)) {
                h = Self::move_red_left(h);
            }
            let left = h.left.take().expect("key is present in left subtree");
            let (left, value) = Self::remove_node(left, key);
            h.left = left;
            removed = value;
        } else {
            if is_red(&h.left) {
                h = Self::rotate_right(h);
            }
            if key == &h.key && h.right.is_none() {
                return (None, Some(h.value));
            }
            if !is_red(&h.right) && !h.right.as_ref().map_or(false, |r| is_red(&r.left)) {
                h = Self::move_red_right(h);
            }
            if key == &h.key {
                // Replace this entry with the successor (minimum of the
                // right subtree), then drop the successor's old node.
                let right = h.right.take().expect("checked non-empty above");
                let (right, min) = Self::delete_min(right);
                h.right = right;
                let min = *min;
                h.key = min.key;
                removed = Some(std::mem::replace(&mut h.value, min.value));
            } else {
                let right = h.right.take().expect("key is present in right subtree");
                let (right, value) = Self::remove_node(right, key);
                h.right = right;
                removed = value;
            }
        }

        (Some(Self::fix_up(h)), removed)
    }
}

/// In-order borrowing iterator.
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn push_left(&mut self, mut link: &'a Link<K, V>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = &node.left;
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(&node.right);
        Some((&node.key, &node.value))
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a TreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
