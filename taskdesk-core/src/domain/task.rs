//! Task domain model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unit of work, as persisted in the tasks collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Identifier of the assigned user. Written as `null` when unassigned;
    /// not checked against the users collection.
    #[serde(default)]
    pub assigned_to: Option<String>,
}

impl Task {
    /// Create an unassigned task with a freshly generated identifier
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            assigned_to: None,
        }
    }
}
