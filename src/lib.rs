//! setstore holds the in-memory aggregates for "set" metrics: metrics whose
//! reported value is the number of _distinct_ values observed for a (metric
//! name, tag-set) pair during a flush interval. A statsd-style aggregation
//! server keeps one such store per aggregation kind; this crate is the store
//! for sets, sitting between the ingestion path that records observations and
//! the flush / expiration paths that read and retire them.
//!
//! The store is a plain in-memory structure. It owns no threads and performs
//! no locking: the host server must serialize ingestion writes, traversal
//! reads and deletions around each flush cycle. All operations are total over
//! their key space; absent keys yield no-ops or empty results, never an
//! error.
#![deny(trivial_numeric_casts, missing_docs, unstable_features, unused_import_braces)]
extern crate chrono;
extern crate fnv;

#[macro_use]
extern crate log;

#[macro_use]
extern crate lazy_static;

#[cfg(test)]
extern crate quickcheck;

pub mod sets;
pub mod tagmap;
pub mod time;
