use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use helix_annotator::{AnnotationCache, Annotator, CommandProvider, HelixConfig};
use helix_core::AntibodySequence;
use helix_formats::fasta;

use super::{print_json, read_file};
use crate::dto::{BatchReportDto, DualAnnotationDto};

/// What to annotate and with which hints.
#[derive(Debug, Default)]
pub struct AnnotateInput {
    pub sequence: Option<String>,
    pub fasta: Option<PathBuf>,
    pub species: Option<String>,
    pub chain: Option<String>,
    pub no_cache: bool,
}

impl AnnotateInput {
    /// Sequences to annotate, with the species/chain labels applied to each.
    fn entries(&self) -> Result<Vec<AntibodySequence>> {
        let mut entries = match (&self.sequence, &self.fasta) {
            (Some(seq), _) => vec![AntibodySequence::new("query", seq.trim())],
            (None, Some(path)) => fasta::parse(&read_file(path)?)
                .with_context(|| format!("Failed to parse FASTA {}", path.display()))?,
            (None, None) => anyhow::bail!("Either --sequence or --fasta is required"),
        };
        for entry in &mut entries {
            entry.labels.species = self.species.clone();
            entry.labels.function = self.chain.clone();
        }
        Ok(entries)
    }
}

pub fn run(config_path: Option<&Path>, input: AnnotateInput) -> Result<()> {
    let config = HelixConfig::load(config_path).context("Failed to load configuration")?;
    let entries = input.entries()?;

    let cache = if config.cache.enabled && !input.no_cache {
        let path = &config.cache.path;
        Some(
            AnnotationCache::open(path)
                .with_context(|| format!("Failed to open cache at {}", path.display()))?,
        )
    } else {
        None
    };

    let provider = CommandProvider::from_config(&config.provider);
    let mut annotator = Annotator::new(provider).with_batch_size(config.batch.size);
    if let Some(cache) = &cache {
        annotator = annotator.with_cache(cache);
    }

    match (input.fasta.is_some(), entries.as_slice()) {
        (false, [single]) => {
            let annotation = annotator
                .annotate(&single.residues, single.species(), single.chain_restriction())
                .context("Annotation failed")?;
            print_json(&DualAnnotationDto::new(&single.id, &annotation))
        }
        _ => {
            let report = annotator.annotate_batch(&entries);
            print_json(&BatchReportDto::from(&report))
        }
    }
}
