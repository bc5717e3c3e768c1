use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::storage::{KeyValueStore, Record, Repository, StoreError};

/// A typed view of one collection inside a [`KeyValueStore`].
///
/// Every operation reads the whole collection and every mutation writes it
/// back in full.
pub struct Collection<'s, S: ?Sized, T> {
    store: &'s mut S,
    record: PhantomData<fn() -> T>,
}

impl<'s, S, T> Collection<'s, S, T>
where
    S: KeyValueStore + ?Sized,
    T: Record,
{
    /// Binds `store` to the collection for `T`.
    pub fn new(store: &'s mut S) -> Self {
        Self {
            store,
            record: PhantomData,
        }
    }

    /// Overwrites the collection with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be serialized or written.
    pub fn replace_all(&mut self, records: &[T]) -> Result<(), StoreError> {
        self.write(records, records.len())
    }

    /// Reads the collection as raw JSON values, without interpreting the
    /// individual records.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or is not a JSON
    /// array.
    pub fn entries(&self) -> Result<Vec<Value>, StoreError> {
        self.read()
    }

    /// Overwrites the collection with raw JSON values.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written.
    pub fn replace_entries(&mut self, entries: &[Value]) -> Result<(), StoreError> {
        self.write(entries, entries.len())
    }

    fn read<V: DeserializeOwned>(&self) -> Result<Vec<V>, StoreError> {
        let raw = self
            .store
            .get(T::KEY)
            .map_err(|source| StoreError::Io { key: T::KEY, source })?;

        match raw {
            None => Ok(Vec::new()),
            Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|source| StoreError::Malformed { key: T::KEY, source }),
        }
    }

    fn write<V: Serialize + ?Sized>(&mut self, values: &V, count: usize) -> Result<(), StoreError> {
        let raw = serde_json::to_string(values)
            .map_err(|source| StoreError::Malformed { key: T::KEY, source })?;
        self.store
            .set(T::KEY, raw)
            .map_err(|source| StoreError::Io { key: T::KEY, source })?;
        tracing::debug!(key = T::KEY, count, "wrote collection");
        Ok(())
    }
}

impl<S, T> Repository<T> for Collection<'_, S, T>
where
    S: KeyValueStore + ?Sized,
    T: Record,
{
    fn list(&self) -> Result<Vec<T>, StoreError> {
        self.read()
    }

    fn upsert(&mut self, record: T) -> Result<(), StoreError> {
        let mut records = self.list()?;
        match records
            .iter_mut()
            .find(|existing| existing.record_id() == record.record_id())
        {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        self.replace_all(&records)
    }

    fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.list()?;
        let before = records.len();
        records.retain(|record| record.record_id() != id);

        if records.len() == before {
            return Ok(false);
        }

        self.replace_all(&records)?;
        Ok(true)
    }
}
