use serde::{Deserialize, Serialize};

use crate::error::NumberingError;
use crate::scheme::{ChainType, Scheme};

/// Marker the numbering tool emits for a scheme position with no residue.
pub const GAP: char = '-';

/// Residue occupying a numbered position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Residue {
    Amino(char),
    Gap,
}

impl Residue {
    pub fn from_char(c: char) -> Self {
        if c == GAP {
            Residue::Gap
        } else {
            Residue::Amino(c)
        }
    }

    pub fn amino_acid(&self) -> Option<char> {
        match self {
            Residue::Amino(c) => Some(*c),
            Residue::Gap => None,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, Residue::Gap)
    }
}

/// One numbered position as emitted by the numbering tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidueNumbering {
    /// Chain/domain marker of the line (e.g. `H`, `L`).
    pub position_type: char,
    pub number: u32,
    #[serde(default)]
    pub insertion_letter: Option<char>,
    pub residue: Residue,
}

impl ResidueNumbering {
    pub fn new(position_type: char, number: u32, residue: Residue) -> Self {
        Self {
            position_type,
            number,
            insertion_letter: None,
            residue,
        }
    }

    pub fn with_insertion(mut self, letter: char) -> Self {
        self.insertion_letter = Some(letter);
        self
    }

    /// Position label in the tool's notation, e.g. `82A`.
    pub fn position_label(&self) -> String {
        match self.insertion_letter {
            Some(letter) => format!("{}{}", self.number, letter),
            None => self.number.to_string(),
        }
    }
}

/// Most significant germline assignment reported alongside the numbering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GermlineHit {
    pub species: String,
    pub v_gene: String,
    pub v_identity: f64,
    pub j_gene: String,
    pub j_identity: f64,
}

/// Metadata of the most significant domain hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberingMetadata {
    pub species: String,
    pub chain_type: String,
    #[serde(rename = "e-value")]
    pub e_value: f64,
    pub score: f64,
    pub seqstart_index: usize,
    pub seqend_index: usize,
    /// Scheme announced by the tool (`# Scheme = imgt`), when present.
    #[serde(default)]
    pub scheme: Option<Scheme>,
    #[serde(default)]
    pub germline: Option<GermlineHit>,
    #[serde(default)]
    pub tool_version: Option<String>,
    #[serde(default)]
    pub tool_source: Option<String>,
}

impl NumberingMetadata {
    pub fn chain(&self) -> Result<ChainType, NumberingError> {
        ChainType::from_code(&self.chain_type)
    }
}

/// Parsed output of one numbering run: records in emission order plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Numbering {
    pub residues: Vec<ResidueNumbering>,
    pub metadata: NumberingMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_residue_from_char() {
        assert_eq!(Residue::from_char('K'), Residue::Amino('K'));
        assert!(Residue::from_char('-').is_gap());
        assert_eq!(Residue::from_char('-').amino_acid(), None);
    }

    #[test]
    fn test_position_label() {
        let plain = ResidueNumbering::new('L', 81, Residue::Amino('L'));
        assert_eq!(plain.position_label(), "81");
        let inserted = ResidueNumbering::new('L', 82, Residue::Amino('S')).with_insertion('B');
        assert_eq!(inserted.position_label(), "82B");
    }

    #[test]
    fn test_metadata_serializes_tool_keys() {
        let meta = NumberingMetadata {
            species: "mouse".to_string(),
            chain_type: "K".to_string(),
            e_value: 2.2e-54,
            score: 174.1,
            seqstart_index: 0,
            seqend_index: 109,
            scheme: None,
            germline: None,
            tool_version: None,
            tool_source: None,
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["e-value"], 2.2e-54);
        assert_eq!(json["seqend_index"], 109);
        assert_eq!(meta.chain().unwrap(), ChainType::Kappa);
    }
}
