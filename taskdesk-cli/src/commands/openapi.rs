//! Openapi command - print the API document

use anyhow::Result;

pub fn run() -> Result<()> {
    crate::output::json(&taskdesk_core::api::openapi::document())
}
