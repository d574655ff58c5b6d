use std::path::PathBuf;

use anyhow::{Context, Result};
use helix_formats::igblast::{self, IgBlastReport};

use super::{print_json, read_file};
use crate::dto::IgBlastDto;

/// Parse one report per chain database and print the best-matching one.
pub fn run(paths: &[PathBuf], sequence: Option<&str>) -> Result<()> {
    let mut reports: Vec<(String, IgBlastReport)> = Vec::with_capacity(paths.len());
    for path in paths {
        let content = read_file(path)?;
        let report = igblast::parse(&content)
            .with_context(|| format!("Failed to parse IgBlast report {}", path.display()))?;
        tracing::debug!(
            report = %path.display(),
            identity = ?report.top_identity(),
            "parsed report"
        );
        reports.push((path.display().to_string(), report));
    }

    let (source, best) = igblast::best_report(&reports)
        .context("No report contains a germline hit with a percent identity")?;
    let dto = IgBlastDto::new(source, best, sequence)
        .context("Failed to cut the query into regions")?;
    print_json(&dto)
}
