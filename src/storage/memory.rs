use std::{cell::Cell, collections::BTreeMap, io};

use crate::storage::KeyValueStore;

/// An in-memory [`KeyValueStore`] that counts how often it is accessed.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
    reads: Cell<usize>,
    writes: usize,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key` without counting it as a write.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    /// Inspects the raw value under `key` without counting it as a read.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Number of [`KeyValueStore::get`] calls so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    /// Number of [`KeyValueStore::set`] calls so far.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> io::Result<()> {
        self.writes += 1;
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_reads_and_writes() {
        let mut store = MemoryStore::new().with("seeded", "1");

        assert_eq!(store.get("seeded").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("missing").unwrap(), None);
        store.set("other", "2".to_string()).unwrap();

        assert_eq!(store.reads(), 2);
        assert_eq!(store.writes(), 1);
        assert_eq!(store.value("other"), Some("2"));
    }
}
