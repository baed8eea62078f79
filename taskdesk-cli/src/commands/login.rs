//! Login command - verify credentials

use std::path::Path;

use anyhow::Result;

use super::{get_context, read_password};
use crate::output;

pub fn run(data_dir: &Path, username: &str, password: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context(data_dir)?;
    let password = read_password(password)?;

    let user = ctx.users.authenticate(username, &password)?;

    if json {
        return output::json(&user.profile());
    }

    output::success("Login successful");
    let mut table = output::create_table();
    table.add_row(vec!["ID", user.id.as_str()]);
    table.add_row(vec!["Username", user.username.as_str()]);
    table.add_row(vec!["Admin", if user.is_admin { "yes" } else { "no" }]);
    println!("{}", table);
    Ok(())
}
