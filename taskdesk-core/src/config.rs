//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "storage": { "usersFile": "users.json", "tasksFile": "tasks.json" },
//!   "tasks": { "requireTitle": false }
//! }
//! ```
//! Every field is optional. Fields this crate does not manage are kept as-is
//! when the file is saved.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

const SETTINGS_FILE: &str = "settings.json";
const DEFAULT_USERS_FILE: &str = "users.json";
const DEFAULT_TASKS_FILE: &str = "tasks.json";

/// Env var that overrides `tasks.requireTitle`
pub const REQUIRE_TITLE_ENV: &str = "TASKDESK_REQUIRE_TITLE";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    storage: StorageSettings,
    #[serde(default)]
    tasks: TaskSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    users_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tasks_file: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskSettings {
    #[serde(default)]
    require_title: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Taskdesk configuration (resolved view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub users_file: String,
    pub tasks_file: String,
    pub require_title: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            users_file: DEFAULT_USERS_FILE.to_string(),
            tasks_file: DEFAULT_TASKS_FILE.to_string(),
            require_title: false,
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing or malformed settings file yields defaults. The
    /// `TASKDESK_REQUIRE_TITLE` env var takes precedence over the file.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config = Self::load_file(data_dir)?;
        let value = std::env::var(REQUIRE_TITLE_ENV).ok();
        Ok(config.with_require_title_override(value.as_deref()))
    }

    /// Load only what settings.json says, ignoring env overrides
    ///
    /// Use this when the config is going to be saved again.
    pub fn load_file(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;

        Ok(Self {
            users_file: raw
                .storage
                .users_file
                .unwrap_or_else(|| DEFAULT_USERS_FILE.to_string()),
            tasks_file: raw
                .storage
                .tasks_file
                .unwrap_or_else(|| DEFAULT_TASKS_FILE.to_string()),
            require_title: raw.tasks.require_title,
        })
    }

    fn with_require_title_override(mut self, value: Option<&str>) -> Self {
        match value {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => self.require_title = true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => self.require_title = false,
            _ => {}
        }
        self
    }

    /// Save config to the data directory, preserving unmanaged settings
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = read_settings(data_dir)?;

        settings.storage.users_file = Some(self.users_file.clone());
        settings.storage.tasks_file = Some(self.tasks_file.clone());
        settings.tasks.require_title = self.require_title;

        std::fs::create_dir_all(data_dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    /// Path of the users collection file
    pub fn users_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.users_file)
    }

    /// Path of the tasks collection file
    pub fn tasks_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.tasks_file)
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)?;
    Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!(
            path = %settings_path.display(),
            error = %e,
            "ignoring malformed settings"
        );
        SettingsFile::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // Tests here avoid setting REQUIRE_TITLE_ENV so they stay independent of
    // each other when run in parallel.

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config.users_file, "users.json");
        assert_eq!(config.tasks_file, "tasks.json");
        assert_eq!(config.users_path(dir.path()), dir.path().join("users.json"));
    }

    #[test]
    fn test_reads_custom_file_names() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"storage": {"usersFile": "people.json"}}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.users_file, "people.json");
        assert_eq!(config.tasks_file, "tasks.json");
    }

    #[test]
    fn test_malformed_settings_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{ nope").unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.users_file, "users.json");
    }

    #[test]
    fn test_save_preserves_unmanaged_fields() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"cors": {"origin": "http://localhost:3000"}, "tasks": {"maxLength": 80}}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.require_title = true;
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("settings.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(saved["cors"]["origin"], "http://localhost:3000");
        assert_eq!(saved["tasks"]["maxLength"], 80);
        assert_eq!(saved["tasks"]["requireTitle"], true);
        assert_eq!(saved["storage"]["tasksFile"], "tasks.json");
    }

    #[test]
    fn test_env_override_applies_to_resolved_config_only() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"tasks": {"requireTitle": false}}"#,
        )
        .unwrap();

        let stored = Config::load_file(dir.path()).unwrap();
        let resolved = stored.clone().with_require_title_override(Some("1"));
        assert!(resolved.require_title);
        assert!(!stored.require_title);

        // Saving the file view keeps the override out of settings.json
        stored.save(dir.path()).unwrap();
        assert!(!Config::load_file(dir.path()).unwrap().require_title);
    }

    #[test]
    fn test_unrecognized_override_keeps_file_value() {
        let config = Config {
            require_title: true,
            ..Config::default()
        };
        assert!(config.clone().with_require_title_override(Some("maybe")).require_title);
        assert!(config.clone().with_require_title_override(None).require_title);
        assert!(!config.with_require_title_override(Some("no")).require_title);
    }
}
