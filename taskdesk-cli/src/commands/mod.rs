//! CLI command implementations

pub mod config;
pub mod login;
pub mod openapi;
pub mod register;
pub mod request;
pub mod status;
pub mod tasks;

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dialoguer::Password;
use taskdesk_core::TaskdeskContext;

/// Resolve the data directory from the flag/env value or the default
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        dirs::home_dir()
            .map(|home| home.join(".taskdesk"))
            .unwrap_or_else(|| PathBuf::from(".taskdesk"))
    })
}

/// Open the taskdesk context for the data directory
pub fn get_context(data_dir: &Path) -> Result<TaskdeskContext> {
    TaskdeskContext::new(data_dir).context("Failed to initialize taskdesk context")
}

/// Use the given password, or ask for one
///
/// Prompts on a terminal; otherwise reads one line from stdin so passwords
/// can be piped in.
pub fn read_password(given: Option<String>) -> Result<String> {
    if let Some(password) = given {
        return Ok(password);
    }

    if atty::is(atty::Stream::Stdin) {
        return Password::new()
            .with_prompt("Password")
            .interact()
            .context("Failed to read password");
    }

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
