//! Sets are the storage for distinct-value ("set") metrics.
//!
//! Each metric name fans out into per-tag-set records so that individual
//! tag combinations can be flushed and expired independently. The store
//! holds one generation of aggregates at a time: ingestion fills it,
//! the flush pass walks it with `each` or `each_while`, and the expiration
//! pass reaps idle entries with `has_children` plus `delete`.

use fnv::FnvHasher;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use time;

/// The hash map type used throughout the store.
pub type HashMapFnv<K, V> = HashMap<K, V, BuildHasherDefault<FnvHasher>>;

/// Flush and reset metadata carried by every aggregated record.
///
/// Each record owns exactly one `Interval`, stamped at creation and never
/// shared between records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    /// Unix time, in seconds, at which the record's window began or was
    /// last reset.
    pub timestamp: i64,
    /// Seconds between flushes of this record.
    pub flush: u64,
}

/// One aggregation record for a single (metric name, tag-set) pair.
///
/// The reportable quantity of a set metric is the number of distinct values
/// observed in the interval, `cardinality`, not the sum of occurrence counts.
/// Occurrence counts are kept anyway so that a sink can do occurrence
/// weighted reporting or debugging later.
#[derive(Clone, Debug, PartialEq)]
pub struct Set {
    /// The number of occurrences for each distinct value observed this
    /// interval, keyed by the value's string form.
    pub values: HashMapFnv<String, u64>,
    /// The flush and reset interval information.
    pub interval: Interval,
}

impl Set {
    /// Create a new Set from a distinct-value / occurrence mapping and its
    /// interval metadata.
    ///
    /// `values` may be empty, representing a metric seen with zero distinct
    /// values this interval. `flush` is expected to be positive; the store
    /// does not validate it, that is the constructing ingestion path's
    /// obligation.
    ///
    /// # Examples
    ///
    /// ```
    /// use setstore::sets::{HashMapFnv, Set};
    ///
    /// let set = Set::new(1483228800, 10, HashMapFnv::default());
    /// assert_eq!(0, set.cardinality());
    /// assert_eq!(10, set.interval.flush);
    /// ```
    pub fn new(timestamp: i64, flush: u64, values: HashMapFnv<String, u64>) -> Set {
        Set {
            values: values,
            interval: Interval {
                timestamp: timestamp,
                flush: flush,
            },
        }
    }

    /// The number of distinct values observed this interval. This is the
    /// quantity a flush pass reports for a set metric.
    pub fn cardinality(&self) -> usize {
        self.values.len()
    }

    /// The total number of observations across all distinct values.
    pub fn occurrences(&self) -> u64 {
        self.values.values().sum()
    }
}

/// Sets stores every set-metric aggregate until flush, keyed first by metric
/// name and then by serialized tag-set.
///
/// A name whose children have all been deleted remains addressable with an
/// empty inner map. `has_children` reports false for it, exactly as for a
/// name that was never inserted, and the expiration pass uses that signal to
/// reap the outer entry with `delete`.
#[derive(Clone, Debug)]
pub struct Sets {
    inner: HashMapFnv<String, HashMapFnv<String, Set>>,
    flush_interval: u64,
}

impl Default for Sets {
    /// Create a default Sets with a 60 second flush interval.
    ///
    /// # Examples
    ///
    /// ```
    /// use setstore::sets::Sets;
    ///
    /// let sets = Sets::default();
    /// assert!(sets.is_empty());
    /// ```
    fn default() -> Sets {
        Sets {
            inner: HashMapFnv::default(),
            flush_interval: 60,
        }
    }
}

impl Sets {
    /// Create a Sets whose ingestion-created records are stamped with the
    /// given flush interval, in seconds.
    pub fn new(flush_interval: u64) -> Sets {
        let mut s = Sets::default();
        s.flush_interval = flush_interval;
        s
    }

    /// The fixed label identifying this aggregation kind, used by reporting
    /// code that treats counters, gauges, timers and sets uniformly.
    pub fn metrics_name(&self) -> &'static str {
        "Sets"
    }

    /// Record one observation of `value` for the given metric name and
    /// serialized tag-set.
    ///
    /// A missing record is created on the fly, stamped with `time::now()`
    /// and the store's flush interval. An existing record has the value's
    /// occurrence count incremented; a value already seen this interval does
    /// not change the record's cardinality.
    ///
    /// # Examples
    ///
    /// ```
    /// use setstore::sets::Sets;
    ///
    /// let mut sets = Sets::default();
    /// sets.add("users.active", "env:prod", "uid-1");
    /// sets.add("users.active", "env:prod", "uid-2");
    /// sets.add("users.active", "env:prod", "uid-1");
    ///
    /// let set = sets.get("users.active", "env:prod").unwrap();
    /// assert_eq!(2, set.cardinality());
    /// assert_eq!(3, set.occurrences());
    /// ```
    pub fn add(&mut self, name: &str, tagset: &str, value: &str) {
        let flush = self.flush_interval;
        let children = self.inner
            .entry(name.to_owned())
            .or_insert_with(HashMapFnv::default);
        let set = children
            .entry(tagset.to_owned())
            .or_insert_with(|| Set::new(time::now(), flush, HashMapFnv::default()));
        *set.values.entry(value.to_owned()).or_insert(0) += 1;
    }

    /// Place a fully-formed Set under the given name and tag-set, replacing
    /// any record already there.
    pub fn insert(&mut self, name: &str, tagset: &str, set: Set) {
        self.inner
            .entry(name.to_owned())
            .or_insert_with(HashMapFnv::default)
            .insert(tagset.to_owned(), set);
    }

    /// Look up the record for a (name, tag-set) pair, if any.
    pub fn get(&self, name: &str, tagset: &str) -> Option<&Set> {
        self.inner.get(name).and_then(|children| children.get(tagset))
    }

    /// Remove a metric name and all of its tag-set children. Deleting an
    /// absent name is a no-op.
    pub fn delete(&mut self, name: &str) {
        self.inner.remove(name);
    }

    /// Remove a single tag-set's record under the given name. A no-op if
    /// either key is absent.
    ///
    /// The outer entry is left in place even if it becomes empty; reaping it
    /// is the caller's job via `has_children` and `delete`.
    pub fn delete_child(&mut self, name: &str, tagset: &str) {
        if let Some(children) = self.inner.get_mut(name) {
            children.remove(tagset);
        }
    }

    /// Whether the given metric name currently has at least one tag-set
    /// child. False both for an absent name and for one whose children have
    /// all been deleted; either way there is nothing to report and the name
    /// is safe to reap.
    ///
    /// # Examples
    ///
    /// ```
    /// use setstore::sets::Sets;
    ///
    /// let mut sets = Sets::default();
    /// assert!(!sets.has_children("users.active"));
    ///
    /// sets.add("users.active", "env:prod", "uid-1");
    /// assert!(sets.has_children("users.active"));
    ///
    /// sets.delete_child("users.active", "env:prod");
    /// assert!(!sets.has_children("users.active"));
    /// ```
    pub fn has_children(&self, name: &str) -> bool {
        self.inner.get(name).map_or(false, |children| !children.is_empty())
    }

    /// Visit every (name, tag-set, record) triple exactly once. Order is
    /// unspecified, across names and across tag-sets within a name.
    pub fn each<F>(&self, mut f: F)
    where
        F: FnMut(&str, &str, &Set),
    {
        for (name, children) in &self.inner {
            for (tagset, set) in children {
                f(name, tagset, set);
            }
        }
    }

    /// Visit (name, tag-set, record) triples while `f` returns true,
    /// stopping at the first false. Returns true if every triple, if any,
    /// was visited.
    ///
    /// No guarantee is made about which triples are visited before an early
    /// stop; the backing maps are unordered.
    pub fn each_while<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&str, &str, &Set) -> bool,
    {
        for (name, children) in &self.inner {
            for (tagset, set) in children {
                if !f(name, tagset, set) {
                    return false;
                }
            }
        }
        true
    }

    /// Reset every record for the next interval: each surviving record's
    /// values are cleared and its timestamp restamped to `time::now()`.
    /// Identities are retained so the expiration pass can observe which
    /// names go quiet and reap them.
    pub fn reset(&mut self) {
        for children in self.inner.values_mut() {
            for set in children.values_mut() {
                set.values.clear();
                set.interval.timestamp = time::now();
            }
        }
    }

    /// The number of metric names currently stored, counting names with
    /// emptied inner maps.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the store holds no metric names at all.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
