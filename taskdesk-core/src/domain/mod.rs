//! Core domain entities
//!
//! All records persisted by the store are defined here. These are pure data
//! structures - no I/O or external dependencies.

mod task;
mod user;
pub mod result;

pub use task::Task;
pub use user::{User, UserProfile};
