pub mod annotate;
pub mod cache;
pub mod classify;
pub mod igblast;
pub mod parse;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Write `value` to stdout as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
