use std::path::Path;

use anyhow::{Context, Result};
use helix_annotator::{AnnotationCache, HelixConfig};
use serde::Serialize;

use super::print_json;

#[derive(Debug, Serialize)]
struct ClearedDto {
    path: String,
    removed: usize,
}

pub fn clear(config_path: Option<&Path>) -> Result<()> {
    let config = HelixConfig::load(config_path).context("Failed to load configuration")?;
    let path = &config.cache.path;
    let cache = AnnotationCache::open(path)
        .with_context(|| format!("Failed to open cache at {}", path.display()))?;
    let removed = cache.reset()?;
    print_json(&ClearedDto {
        path: path.display().to_string(),
        removed,
    })
}
