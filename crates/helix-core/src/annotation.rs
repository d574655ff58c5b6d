use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::NumberingError;
use crate::numbering::{Numbering, NumberingMetadata, ResidueNumbering};
use crate::regions::classify;
use crate::scheme::{ChainType, Region, RegionLabel, Scheme};

/// Region subsequences of one sequence under one scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationResult {
    pub scheme: Scheme,
    pub chain_type: ChainType,
    /// Regions with at least one residue; empty regions are absent.
    pub regions: BTreeMap<Region, String>,
    pub metadata: NumberingMetadata,
}

impl AnnotationResult {
    /// Build the result for a parsed numbering run, using the chain type it reports.
    pub fn from_numbering(numbering: &Numbering, scheme: Scheme) -> Result<Self, NumberingError> {
        let chain_type = numbering.metadata.chain()?;
        let regions = aggregate(&numbering.residues, chain_type, scheme)?;
        Ok(Self {
            scheme,
            chain_type,
            regions,
            metadata: numbering.metadata.clone(),
        })
    }

    pub fn region(&self, region: Region) -> Option<&str> {
        self.regions.get(&region).map(String::as_str)
    }

    /// Regions keyed by their scheme-qualified label.
    pub fn labelled(&self) -> impl Iterator<Item = (RegionLabel, &str)> {
        self.regions
            .iter()
            .map(move |(region, seq)| (RegionLabel::new(*region, self.scheme), seq.as_str()))
    }
}

/// Group numbered residues into framework/CDR subsequences.
///
/// Gaps are dropped, residues keep the order they were emitted in (so
/// insertion-lettered positions stay in tool order), and regions with no
/// residue are left out of the map. Any unclassifiable position fails the
/// whole sequence.
pub fn aggregate(
    residues: &[ResidueNumbering],
    chain: ChainType,
    scheme: Scheme,
) -> Result<BTreeMap<Region, String>, NumberingError> {
    let mut regions: BTreeMap<Region, String> = BTreeMap::new();

    for record in residues {
        let Some(aa) = record.residue.amino_acid() else {
            continue;
        };
        let region = classify(record.number, chain, scheme)?;
        regions.entry(region).or_default().push(aa);
    }

    Ok(regions)
}

/// IMGT and Kabat annotation of the same sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualAnnotation {
    pub imgt: AnnotationResult,
    pub kabat: AnnotationResult,
}

impl DualAnnotation {
    /// Flatten both schemes into registry fields (`FR1_IMGT`, `CDR3_Kabat`, ...).
    pub fn fields(&self) -> BTreeMap<String, String> {
        self.imgt
            .labelled()
            .chain(self.kabat.labelled())
            .map(|(label, seq)| (label.field_name(), seq.to_string()))
            .collect()
    }

    pub fn get(&self, scheme: Scheme) -> &AnnotationResult {
        match scheme {
            Scheme::Imgt => &self.imgt,
            Scheme::Kabat => &self.kabat,
        }
    }
}
