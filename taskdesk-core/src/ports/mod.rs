//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. Repositories
//! depend only on these traits, not on concrete implementations.

mod record_store;

pub use record_store::RecordStore;
