//! Adapter implementations
//!
//! Concrete implementations of the port traits.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
