//! Record store port - durable collection abstraction

use crate::domain::result::Result;

/// A durable, homogeneous collection of records
///
/// The whole collection is the unit of I/O: it is loaded in full and
/// replaced in full. Implementations guarantee that a `load` never observes
/// a partially written collection, and that `update` cycles against the same
/// collection never interleave.
pub trait RecordStore<T>: Send + Sync {
    /// Load the full collection in stored order
    ///
    /// A collection that has never been written is empty, not an error.
    fn load(&self) -> Result<Vec<T>>;

    /// Overwrite the whole collection
    fn replace(&self, records: &[T]) -> Result<()>;

    /// Run one serialized read-modify-write cycle
    ///
    /// `mutate` receives the current collection. When it returns `Ok`, the
    /// mutated collection is written back before the lock is released; when
    /// it returns `Err`, nothing is written and the error is passed through.
    fn update<R, F>(&self, mutate: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R>;
}
