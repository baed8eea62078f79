//! Status command - record counts and file locations

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use super::get_context;
use crate::output;

pub fn run(data_dir: &Path, json: bool) -> Result<()> {
    let ctx = get_context(data_dir)?;
    let users = ctx.users.count()?;
    let tasks = ctx.tasks.count()?;

    if json {
        return output::json(&json!({
            "data_dir": ctx.data_dir.display().to_string(),
            "users": { "count": users, "path": ctx.users_path().display().to_string() },
            "tasks": { "count": tasks, "path": ctx.tasks_path().display().to_string() },
            "require_title": ctx.config.require_title,
        }));
    }

    println!("{}", "Taskdesk Status".bold());
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Collection", "Records", "File"]);
    table.add_row(vec![
        "Users".to_string(),
        users.to_string(),
        ctx.users_path().display().to_string(),
    ]);
    table.add_row(vec![
        "Tasks".to_string(),
        tasks.to_string(),
        ctx.tasks_path().display().to_string(),
    ]);
    println!("{}", table);

    if ctx.config.require_title {
        println!("Task titles are required.");
    }
    Ok(())
}
