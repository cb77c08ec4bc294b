//! tagmap is the key, value collection of tags attached to a metric
//! observation. The ingestion path turns each observation's tags into the
//! serialized tag-set string that keys the inner level of `sets::Sets`;
//! equal tag combinations must produce equal keys no matter what order the
//! tags arrived in, which is why this map keeps its entries sorted.

use std::slice::Iter;

/// A small sorted map of tag key, value pairs. Behaves similarly to
/// `std::collections::HashMap` but is specialized for fast searching over
/// the handful of tags a single observation carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagMap {
    inner: Vec<(String, String)>,
}

impl Default for TagMap {
    fn default() -> TagMap {
        TagMap {
            inner: Vec::with_capacity(15),
        }
    }
}

impl TagMap {
    /// Create an iterator over the key, value pairs, in key order.
    pub fn iter(&self) -> Iter<(String, String)> {
        self.inner.iter()
    }

    /// Get a value from the tagmap, if it exists.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.inner.binary_search_by(|probe| probe.0.as_str().cmp(key)) {
            Ok(idx) => Some(&self.inner[idx].1),
            Err(_) => None,
        }
    }

    /// Remove a value from the tagmap. The value will be returned if it
    /// existed.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        match self.inner.binary_search_by(|probe| probe.0.as_str().cmp(key)) {
            Ok(idx) => Some(self.inner.remove(idx).1),
            Err(_) => None,
        }
    }

    /// Insert a key, value pair into self.
    ///
    /// This method will return the value previously stored under the given
    /// key, if there was such a value.
    pub fn insert<S>(&mut self, key: S, val: S) -> Option<String>
    where
        S: Into<String>,
    {
        let key = key.into();
        let val = val.into();
        match self.inner.binary_search_by(|probe| probe.0.cmp(&key)) {
            Ok(idx) => {
                self.inner.push((key, val));
                let old = self.inner.swap_remove(idx);
                Some(old.1)
            }
            Err(idx) => {
                self.inner.insert(idx, (key, val));
                None
            }
        }
    }

    /// Merge another tagmap into self.
    ///
    /// Keys missing from self are copied over from `other`; keys present in
    /// self keep their existing values.
    pub fn merge(&mut self, other: &TagMap) {
        for &(ref key, ref val) in &other.inner {
            match self.inner.binary_search_by(|probe| probe.0.cmp(key)) {
                Ok(_) => {}
                Err(idx) => {
                    self.inner.insert(idx, (key.clone(), val.clone()));
                }
            }
        }
    }

    /// The total number of key, value pairs stored in the map.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Determine if the tagmap is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The canonical serialized form of this tag combination, `key:value`
    /// pairs joined by commas in key order. This string keys the inner level
    /// of `sets::Sets`; two tagmaps holding the same pairs always serialize
    /// identically, whatever order their tags were inserted in.
    ///
    /// # Examples
    ///
    /// ```
    /// use setstore::tagmap::TagMap;
    ///
    /// let mut tags = TagMap::default();
    /// tags.insert("host", "lolcatz");
    /// tags.insert("env", "prod");
    /// assert_eq!("env:prod,host:lolcatz", tags.to_key());
    /// ```
    pub fn to_key(&self) -> String {
        let mut key = String::new();
        for (i, &(ref k, ref v)) in self.inner.iter().enumerate() {
            if i > 0 {
                key.push(',');
            }
            key.push_str(k);
            key.push(':');
            key.push_str(v);
        }
        key
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_to_key_insertion_order_independent() {
        let mut left = TagMap::default();
        left.insert("source", "statsd");
        left.insert("host", "lolcatz");
        left.insert("env", "prod");

        let mut right = TagMap::default();
        right.insert("env", "prod");
        right.insert("host", "lolcatz");
        right.insert("source", "statsd");

        assert_eq!(left, right);
        assert_eq!(left.to_key(), right.to_key());
        assert_eq!("env:prod,host:lolcatz,source:statsd", left.to_key());
    }

    #[test]
    fn test_empty_tagmap_key() {
        let tags = TagMap::default();
        assert!(tags.is_empty());
        assert_eq!("", tags.to_key());
    }

    #[test]
    fn test_insert_overwrite_returns_old() {
        let mut tags = TagMap::default();
        assert_eq!(None, tags.insert("env", "staging"));
        assert_eq!(Some(String::from("staging")), tags.insert("env", "prod"));
        assert_eq!(Some("prod"), tags.get("env"));
        assert_eq!(1, tags.len());
    }

    #[test]
    fn test_remove() {
        let mut tags = TagMap::default();
        tags.insert("env", "prod");
        tags.insert("host", "lolcatz");

        assert_eq!(Some(String::from("prod")), tags.remove("env"));
        assert_eq!(None, tags.remove("env"));
        assert_eq!("host:lolcatz", tags.to_key());
    }

    #[test]
    fn test_merge_does_not_overwrite() {
        let mut left = TagMap::default();
        left.insert("env", "prod");

        let mut right = TagMap::default();
        right.insert("env", "staging");
        right.insert("host", "lolcatz");

        left.merge(&right);
        assert_eq!(Some("prod"), left.get("env"));
        assert_eq!(Some("lolcatz"), left.get("host"));
    }
}
