use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use super::PointId;

/// Set of claimed points. The value is whatever the claimer wants to record.
pub type ConcurrentPointSet<V = ()> = ConcurrentMap<PointId, V>;

/// A fixed-size, lock-striped hash map.
///
/// The table has a fixed number of buckets chosen at construction and is
/// never resized. Each bucket is a reader/writer lock around a small arena of
/// entries that are chained by index. Every entry guards its value with its
/// own mutex so that a value can be replaced in place while other callers
/// hold the bucket's shared lock.
///
/// Any number of threads may call [`put`](Self::put),
/// [`insert_if_absent`](Self::insert_if_absent) and [`get`](Self::get)
/// concurrently. A key is stored at most once in the whole table.
///
/// Size the table generously: chains grow linearly with the number of keys
/// per bucket.
pub struct ConcurrentMap<K, V, S = RandomState> {
  buckets: Box<[RwLock<Bucket<K, V>>]>,
  hasher: S,
  len: AtomicUsize,
  insertions: AtomicUsize,
  wasted_insertions: AtomicUsize,
}

struct Entry<K, V> {
  key: K,
  value: Mutex<V>,
  next: Option<usize>,
}

struct Bucket<K, V> {
  entries: Vec<Entry<K, V>>,
  head: Option<usize>,
  tail: Option<usize>,
}

impl<K: Eq, V> Bucket<K, V> {
  fn new() -> Self {
    Bucket {
      entries: Vec::new(),
      head: None,
      tail: None,
    }
  }

  fn find(&self, key: &K) -> Option<&Entry<K, V>> {
    let mut cursor = self.head;
    while let Some(idx) = cursor {
      let entry = &self.entries[idx];
      if &entry.key == key {
        return Some(entry);
      }
      cursor = entry.next;
    }
    None
  }

  fn find_mut(&mut self, key: &K) -> Option<&mut Entry<K, V>> {
    let mut cursor = self.head;
    while let Some(idx) = cursor {
      if &self.entries[idx].key == key {
        return Some(&mut self.entries[idx]);
      }
      cursor = self.entries[idx].next;
    }
    None
  }

  // Caller holds the bucket's exclusive lock.
  fn append(&mut self, key: K, value: V) {
    let idx = self.entries.len();
    self.entries.push(Entry {
      key,
      value: Mutex::new(value),
      next: None,
    });
    match self.tail {
      Some(tail) => self.entries[tail].next = Some(idx),
      None => self.head = Some(idx),
    }
    self.tail = Some(idx);
  }
}

/// Counters describing how a [`ConcurrentMap`] was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapStats {
  pub buckets: usize,
  pub len: usize,
  /// Entries appended to a chain.
  pub insertions: usize,
  /// Writers that waited for the exclusive lock only to find the key had
  /// been inserted in the meantime.
  pub wasted_insertions: usize,
}

impl<K: Hash + Eq, V> ConcurrentMap<K, V> {
  pub fn new(size: usize) -> Self {
    ConcurrentMap::with_hasher(size, RandomState::new())
  }
}

impl<K, V, S> ConcurrentMap<K, V, S>
where
  K: Hash + Eq,
  S: BuildHasher,
{
  /// A table with `size` buckets (at least one).
  pub fn with_hasher(size: usize, hasher: S) -> Self {
    let buckets = (0..size.max(1)).map(|_| RwLock::new(Bucket::new())).collect();
    ConcurrentMap {
      buckets,
      hasher,
      len: AtomicUsize::new(0),
      insertions: AtomicUsize::new(0),
      wasted_insertions: AtomicUsize::new(0),
    }
  }

  fn bucket(&self, key: &K) -> &RwLock<Bucket<K, V>> {
    let hash = self.hasher.hash_one(key);
    // The modulus is below `buckets.len()`, so it fits in a usize.
    let idx = (hash % self.buckets.len() as u64) as usize;
    &self.buckets[idx]
  }

  /// Insert or overwrite. Returns `true` if the key was not present.
  ///
  /// The bucket is first probed under its shared lock. An existing entry is
  /// updated in place under the entry lock. Otherwise the exclusive lock is
  /// taken and the bucket is probed again, since another writer may have
  /// inserted the key while this one was waiting.
  pub fn put(&self, key: K, value: V) -> bool {
    let bucket = self.bucket(&key);
    {
      let chain = bucket.read().unwrap_or_else(PoisonError::into_inner);
      if let Some(entry) = chain.find(&key) {
        *entry.value.lock().unwrap_or_else(PoisonError::into_inner) = value;
        return false;
      }
    }
    let mut chain = bucket.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(entry) = chain.find_mut(&key) {
      *entry.value.get_mut().unwrap_or_else(PoisonError::into_inner) = value;
      self.wasted_insertions.fetch_add(1, Ordering::Relaxed);
      return false;
    }
    chain.append(key, value);
    self.len.fetch_add(1, Ordering::AcqRel);
    self.insertions.fetch_add(1, Ordering::Relaxed);
    true
  }

  /// Insert only if the key is absent. Returns `true` for exactly one caller
  /// per key: the one whose entry ended up in the table.
  pub fn insert_if_absent(&self, key: K, value: V) -> bool {
    let bucket = self.bucket(&key);
    {
      let chain = bucket.read().unwrap_or_else(PoisonError::into_inner);
      if chain.find(&key).is_some() {
        return false;
      }
    }
    let mut chain = bucket.write().unwrap_or_else(PoisonError::into_inner);
    if chain.find(&key).is_some() {
      self.wasted_insertions.fetch_add(1, Ordering::Relaxed);
      return false;
    }
    chain.append(key, value);
    self.len.fetch_add(1, Ordering::AcqRel);
    self.insertions.fetch_add(1, Ordering::Relaxed);
    true
  }

  /// Clone of the value stored for `key`.
  pub fn get(&self, key: &K) -> Option<V>
  where
    V: Clone,
  {
    let chain = self.bucket(key).read().unwrap_or_else(PoisonError::into_inner);
    chain.find(key).map(|entry| {
      entry
        .value
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
    })
  }

  pub fn contains_key(&self, key: &K) -> bool {
    let chain = self.bucket(key).read().unwrap_or_else(PoisonError::into_inner);
    chain.find(key).is_some()
  }

  pub fn len(&self) -> usize {
    self.len.load(Ordering::Acquire)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn stats(&self) -> MapStats {
    MapStats {
      buckets: self.buckets.len(),
      len: self.len(),
      insertions: self.insertions.load(Ordering::Relaxed),
      wasted_insertions: self.wasted_insertions.load(Ordering::Relaxed),
    }
  }
}

impl<K, V, S> fmt::Debug for ConcurrentMap<K, V, S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ConcurrentMap")
      .field("buckets", &self.buckets.len())
      .field("len", &self.len.load(Ordering::Relaxed))
      .finish()
  }
}
