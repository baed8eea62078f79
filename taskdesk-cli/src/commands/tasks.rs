//! Tasks command - list (admin only) and create tasks

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum TasksCommands {
    /// List every task (requires an admin caller)
    List {
        /// ID of the calling user
        #[arg(long)]
        caller: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new, unassigned task
    Create {
        /// Task title
        #[arg(short, long)]
        title: Option<String>,
        /// Task description
        #[arg(short, long)]
        description: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(data_dir: &Path, command: TasksCommands) -> Result<()> {
    let ctx = get_context(data_dir)?;

    match command {
        TasksCommands::List { caller, json } => {
            ctx.gate.require_admin(Some(&caller))?;
            let tasks = ctx.tasks.list_all()?;

            if json {
                return output::json(&tasks);
            }

            if tasks.is_empty() {
                println!("No tasks found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Title", "Description", "Assigned To"]);
            for task in &tasks {
                table.add_row(vec![
                    task.id.as_str(),
                    task.title.as_str(),
                    task.description.as_str(),
                    task.assigned_to.as_deref().unwrap_or("-"),
                ]);
            }
            println!("{}", table);
        }
        TasksCommands::Create { title, description, json } => {
            let task = ctx.tasks.create(
                title.as_deref().unwrap_or_default(),
                description.as_deref().unwrap_or_default(),
            )?;

            if json {
                return output::json(&task);
            }

            println!("{} Created task {}", "✓".green(), task.id);
            if task.title.is_empty() {
                output::warning("Task has no title");
            }
        }
    }

    Ok(())
}
