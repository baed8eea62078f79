//! In-memory record store
//!
//! Same contract as the file store without touching disk. Used for
//! repository unit tests and for embedding the core without a data directory.

use std::sync::{PoisonError, RwLock};

use crate::domain::result::Result;
use crate::ports::RecordStore;

/// Volatile implementation of [`RecordStore`]
#[derive(Debug, Default)]
pub struct MemoryStore<T> {
    records: RwLock<Vec<T>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Create a store pre-populated with `records`
    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl<T> RecordStore<T> for MemoryStore<T>
where
    T: Clone + Send + Sync,
{
    fn load(&self) -> Result<Vec<T>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records.clone())
    }

    fn replace(&self, records: &[T]) -> Result<()> {
        let mut current = self.records.write().unwrap_or_else(PoisonError::into_inner);
        *current = records.to_vec();
        Ok(())
    }

    fn update<R, F>(&self, mutate: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R>,
    {
        let mut current = self.records.write().unwrap_or_else(PoisonError::into_inner);
        // Work on a copy so a failed mutation leaves the collection as it was
        let mut working = current.clone();
        let outcome = mutate(&mut working)?;
        *current = working;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::result::Error;

    #[test]
    fn test_starts_empty() {
        let store: MemoryStore<u32> = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_failed_update_keeps_prior_state() {
        let store = MemoryStore::with_records(vec![1u32, 2]);
        let result: Result<()> = store.update(|records| {
            records.clear();
            Err(Error::validation("nope"))
        });

        assert!(result.is_err());
        assert_eq!(store.load().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_replace_and_update() {
        let store = MemoryStore::new();
        store.replace(&[1u32]).unwrap();
        store
            .update(|records| {
                records.push(2);
                Ok(())
            })
            .unwrap();
        assert_eq!(store.load().unwrap(), vec![1, 2]);
    }
}
