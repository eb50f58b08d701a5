//! Bounded TTL cache.
//!
//! Deliberately an explicit component the caller owns and injects, not a
//! module-level singleton, so tests control its lifetime and contents.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::hash::Hash;
use std::time::{Duration, Instant};

pub struct TtlCache<K, V> {
    capacity: usize,
    ttl: Duration,
    entries: HashMap<K, (Instant, V)>,
    insertion_order: VecDeque<K>,
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            entries: HashMap::new(),
            insertion_order: VecDeque::new(),
        }
    }

    /// Fetch a live entry; expired entries are dropped on access.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ToOwned<Owned = K> + ?Sized,
    {
        let expired = match self.entries.get(key.borrow()) {
            Some((stored_at, _)) => stored_at.elapsed() > self.ttl,
            None => return None,
        };

        if expired {
            self.entries.remove(key.borrow());
            return None;
        }

        self.entries.get(key.borrow()).map(|(_, v)| v.clone())
    }

    pub fn put(&mut self, key: K, value: V) {
        if !self.entries.contains_key(&key) {
            // Evict oldest inserts until there is room.
            while self.entries.len() >= self.capacity {
                match self.insertion_order.pop_front() {
                    Some(old) => {
                        self.entries.remove(&old);
                    }
                    None => break,
                }
            }
            self.insertion_order.push_back(key.clone());
        }
        self.entries.insert(key, (Instant::now(), value));
    }

    pub fn invalidate<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.remove(key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.insertion_order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
