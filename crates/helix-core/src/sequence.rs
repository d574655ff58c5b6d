use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scheme::{ChainRestriction, RegionLabel, Species};

/// Labels attached to a sequence record by the registry it came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SequenceLabels {
    /// Free-text species label, e.g. "Homo Sapiens".
    #[serde(default)]
    pub species: Option<String>,
    /// Chain/function label, e.g. "VH" or "LC-kappa".
    #[serde(default)]
    pub function: Option<String>,
}

/// An antibody amino-acid sequence record awaiting (or holding) annotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntibodySequence {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub residues: String,
    #[serde(default)]
    pub labels: SequenceLabels,
    /// Annotation fields already stored for this record, keyed `CDR1_IMGT` etc.
    #[serde(default)]
    pub annotation: BTreeMap<String, String>,
}

impl AntibodySequence {
    pub fn new(id: impl Into<String>, residues: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            residues: residues.into().to_uppercase(),
            labels: SequenceLabels::default(),
            annotation: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// True when every region of both schemes already has a stored value.
    pub fn is_fully_annotated(&self) -> bool {
        RegionLabel::all().all(|label| {
            self.annotation
                .get(&label.field_name())
                .is_some_and(|v| !v.is_empty())
        })
    }

    pub fn species(&self) -> Option<Species> {
        self.labels.species.as_deref().and_then(Species::normalize)
    }

    pub fn chain_restriction(&self) -> Option<ChainRestriction> {
        self.labels
            .function
            .as_deref()
            .and_then(ChainRestriction::from_label)
    }
}

/// Pick the species label for a sequence from the entities that reference it.
///
/// The sequence's own label wins, then its variable region's, then the
/// desired product's.
pub fn resolve_species<'a>(
    feature: Option<&'a str>,
    variable_region: Option<&'a str>,
    product: Option<&'a str>,
) -> Option<&'a str> {
    [feature, variable_region, product]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
}
