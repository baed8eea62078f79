//! Register command - create a user account

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use super::{get_context, read_password};

pub fn run(
    data_dir: &Path,
    username: &str,
    password: Option<String>,
    admin: bool,
    json: bool,
) -> Result<()> {
    let ctx = get_context(data_dir)?;
    let password = read_password(password)?;

    let user = ctx.users.register(username, &password, admin)?;

    if json {
        return crate::output::json(&user.profile());
    }

    println!("{} Registered {}", "✓".green(), user.username.bold());
    println!("  ID:    {}", user.id);
    if user.is_admin {
        println!("  Role:  {}", "admin".cyan());
    }
    Ok(())
}
