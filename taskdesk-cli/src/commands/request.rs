//! Request command - send one request through the api dispatcher

use std::path::Path;
use std::process::exit;

use anyhow::{Context, Result};
use colored::Colorize;
use http::{Method, Request};
use taskdesk_core::api::CALLER_ID_HEADER;

use super::get_context;

pub fn run(
    data_dir: &Path,
    method: &str,
    path: &str,
    caller: Option<&str>,
    body: Option<&str>,
) -> Result<()> {
    let ctx = get_context(data_dir)?;

    let method = Method::from_bytes(method.to_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method: {}", method))?;

    let mut builder = Request::builder().method(method).uri(path);
    if let Some(id) = caller {
        builder = builder.header(CALLER_ID_HEADER, id);
    }
    let request = builder
        .body(body.unwrap_or_default().as_bytes().to_vec())
        .context("Invalid request")?;

    let response = ctx.api.handle(&request);
    let status = response.status();

    let status_line = status.to_string();
    if status.is_success() {
        eprintln!("{}", status_line.green());
    } else {
        eprintln!("{}", status_line.red());
    }
    println!("{}", serde_json::to_string_pretty(response.body())?);

    if !status.is_success() {
        exit(1);
    }
    Ok(())
}
