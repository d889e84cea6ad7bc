use std::collections::BTreeMap;

use crate::repositories::traits::KvStore;

/// Write-buffering layer over a parent store.
///
/// Reads see buffered writes first. Nothing reaches the parent until
/// [`CacheStore::write`]; dropping the cache discards the buffered writes.
pub struct CacheStore<'p, S: KvStore + ?Sized> {
    parent: &'p mut S,
    // `None` marks a buffered delete
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'p, S: KvStore + ?Sized> CacheStore<'p, S> {
    pub fn new(parent: &'p mut S) -> Self {
        Self {
            parent,
            writes: BTreeMap::new(),
        }
    }

    /// Flush the buffered writes into the parent, in key order.
    pub fn write(self) {
        for (key, value) in self.writes {
            match value {
                Some(value) => self.parent.set(&key, value),
                None => self.parent.delete(&key),
            }
        }
    }
}

impl<'p, S: KvStore + ?Sized> KvStore for CacheStore<'p, S> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.writes.get(key) {
            Some(buffered) => buffered.clone(),
            None => self.parent.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.writes.insert(key.to_vec(), Some(value));
    }

    fn delete(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = self.parent.prefix_scan(prefix).into_iter().collect();

        for (key, value) in self
            .writes
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
        {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        merged.into_iter().collect()
    }
}
