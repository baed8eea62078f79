//! Service layer - repositories and the authorization gate
//!
//! Each service wraps a record store port and adds the invariants of one
//! collection.

mod auth;
mod task;
mod user;

pub use auth::AuthorizationGate;
pub use task::TaskRepository;
pub use user::UserRepository;
