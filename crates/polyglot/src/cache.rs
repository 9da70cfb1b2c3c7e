//! Bounded LRU cache.
//!
//! Backs formatting-locale resolution and the ad hoc template cache. The
//! cache is a hash index over an intrusive doubly linked recency list; the
//! list nodes live in a slab and link by index, all behind one mutex, so
//! every operation is O(1) and takes the lock exactly once.
//!
//! Reads skip the recency update while the cache is below capacity. Until
//! eviction is possible the order is irrelevant, and most caches here never
//! fill up.

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::Mutex;

struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

struct Inner<K, V> {
    index: HashMap<K, usize>,
    nodes: Vec<Node<K, V>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

/// A thread-safe LRU cache with a fixed capacity.
///
/// `get` clones the stored value out; values are expected to be cheap
/// handles (`Arc`s, small enums). Inserting into a full cache evicts the
/// least recently used entry.
pub struct LruCache<K, V> {
    capacity: usize,
    inner: Mutex<Inner<K, V>>,
}

impl<K: Eq + Hash + Clone, V: Clone> LruCache<K, V> {
    /// A cache holding at most `capacity` entries. Capacity is at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: Mutex::new(Inner {
                index: HashMap::with_capacity(capacity),
                nodes: Vec::with_capacity(capacity),
                free: Vec::new(),
                head: None,
                tail: None,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.inner.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock();
        let idx = *inner.index.get(key)?;
        if inner.index.len() >= self.capacity {
            inner.promote(idx);
        }
        Some(inner.nodes[idx].value.clone())
    }

    /// Insert or replace. Replacing an existing key refreshes its recency.
    pub fn put(&self, key: K, value: V) {
        let mut inner = self.inner.lock();
        if let Some(&idx) = inner.index.get(&key) {
            inner.nodes[idx].value = value;
            inner.promote(idx);
            return;
        }
        if inner.index.len() >= self.capacity {
            inner.evict_tail();
        }
        inner.insert(key, value);
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock();
        let idx = inner.index.remove(key)?;
        inner.unlink(idx);
        inner.free.push(idx);
        Some(inner.nodes[idx].value.clone())
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.index.clear();
        inner.nodes.clear();
        inner.free.clear();
        inner.head = None;
        inner.tail = None;
    }

    /// Look up `key`, computing and caching the value on a miss.
    ///
    /// The value is computed outside the lock. Two threads racing on the
    /// same missing key may both compute; the first insert wins and the
    /// loser's value is dropped.
    pub fn get_or_insert_with(&self, key: K, create: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = create();
        let mut inner = self.inner.lock();
        if let Some(&idx) = inner.index.get(&key) {
            return inner.nodes[idx].value.clone();
        }
        if inner.index.len() >= self.capacity {
            inner.evict_tail();
        }
        inner.insert(key, value.clone());
        value
    }

    /// Fallible variant of [`LruCache::get_or_insert_with`]. Errors are not
    /// cached.
    pub fn try_get_or_insert_with<E>(
        &self,
        key: K,
        create: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = create()?;
        let mut inner = self.inner.lock();
        if let Some(&idx) = inner.index.get(&key) {
            return Ok(inner.nodes[idx].value.clone());
        }
        if inner.index.len() >= self.capacity {
            inner.evict_tail();
        }
        inner.insert(key, value.clone());
        Ok(value)
    }
}

impl<K: Eq + Hash + Clone, V> Inner<K, V> {
    fn insert(&mut self, key: K, value: V) {
        let node = Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        self.index.insert(key, idx);
        self.link_front(idx);
    }

    fn evict_tail(&mut self) {
        let Some(tail) = self.tail else { return };
        self.unlink(tail);
        let key = self.nodes[tail].key.clone();
        self.index.remove(&key);
        self.free.push(tail);
    }

    fn promote(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.link_front(idx);
    }

    fn link_front(&mut self, idx: usize) {
        self.nodes[idx].prev = None;
        self.nodes[idx].next = self.head;
        if let Some(old_head) = self.head {
            self.nodes[old_head].prev = Some(idx);
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn unlink(&mut self, idx: usize) {
        let prev = self.nodes[idx].prev;
        let next = self.nodes[idx].next;
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
        self.nodes[idx].prev = None;
        self.nodes[idx].next = None;
    }
}
