//! Taskdesk Core - durable user and task records
//!
//! This crate implements the core following hexagonal architecture:
//!
//! - **domain**: Records (User, Task) and the error taxonomy
//! - **ports**: The `RecordStore` trait every collection is persisted through
//! - **adapters**: Concrete stores (JSON file, in-memory)
//! - **services**: Repositories and the authorization gate
//! - **api**: Transport-free request dispatcher over the services

pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::JsonFileStore;
use api::Api;
use config::Config;
use services::{AuthorizationGate, TaskRepository, UserRepository};

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{Task, User, UserProfile};
pub use ports::RecordStore;

pub type FileUserRepository = UserRepository<JsonFileStore<User>>;
pub type FileTaskRepository = TaskRepository<JsonFileStore<Task>>;
pub type FileApi = Api<JsonFileStore<User>, JsonFileStore<Task>>;

/// Main context for Taskdesk operations
///
/// Holds the configuration and one store per collection, shared by the
/// repositories, the gate and the api dispatcher. Create one per process and
/// share it; every request against it goes through the same locks.
pub struct TaskdeskContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub users: Arc<FileUserRepository>,
    pub tasks: Arc<FileTaskRepository>,
    pub gate: AuthorizationGate<JsonFileStore<User>>,
    pub api: FileApi,
}

impl TaskdeskContext {
    /// Create a context rooted at `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

        let config = Config::load(data_dir).context("Failed to load settings")?;

        let user_store = Arc::new(JsonFileStore::new(config.users_path(data_dir)));
        let task_store = Arc::new(JsonFileStore::new(config.tasks_path(data_dir)));

        let users = Arc::new(UserRepository::new(user_store));
        let tasks = Arc::new(
            TaskRepository::new(task_store).with_required_title(config.require_title),
        );
        let gate = AuthorizationGate::new(Arc::clone(&users));
        let api = Api::new(Arc::clone(&users), Arc::clone(&tasks));

        tracing::debug!(
            data_dir = %data_dir.display(),
            require_title = config.require_title,
            "initialized context"
        );

        Ok(Self {
            config,
            data_dir: data_dir.to_path_buf(),
            users,
            tasks,
            gate,
            api,
        })
    }

    pub fn users_path(&self) -> PathBuf {
        self.config.users_path(&self.data_dir)
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.config.tasks_path(&self.data_dir)
    }
}
