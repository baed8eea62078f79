//! Config command - change settings.json

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use taskdesk_core::config::{Config, REQUIRE_TITLE_ENV};

use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Require a non-empty title when creating tasks
    RequireTitle {
        #[command(subcommand)]
        state: Toggle,
    },
    /// Show the resolved settings
    Show,
}

#[derive(Subcommand)]
pub enum Toggle {
    #[command(name = "on")]
    On,
    #[command(name = "off")]
    Off,
}

pub fn run(data_dir: &Path, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::RequireTitle { state } => {
            // The file view, so an env override is never written back
            let mut config = Config::load_file(data_dir)?;
            config.require_title = matches!(state, Toggle::On);
            config.save(data_dir)?;
            if config.require_title {
                println!("Task titles are now {}", "required".green());
            } else {
                println!("Task titles are now {}", "optional".yellow());
            }
            if std::env::var_os(REQUIRE_TITLE_ENV).is_some() {
                output::warning(&format!(
                    "{} is set and overrides this setting",
                    REQUIRE_TITLE_ENV
                ));
            }
        }
        ConfigCommands::Show => {
            let config = Config::load(data_dir)?;
            let mut table = output::create_table();
            table.add_row(vec![
                "Users file".to_string(),
                config.users_path(data_dir).display().to_string(),
            ]);
            table.add_row(vec![
                "Tasks file".to_string(),
                config.tasks_path(data_dir).display().to_string(),
            ]);
            table.add_row(vec![
                "Require title".to_string(),
                config.require_title.to_string(),
            ]);
            println!("{}", table);
        }
    }

    Ok(())
}
