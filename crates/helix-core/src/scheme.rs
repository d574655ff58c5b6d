use serde::{Deserialize, Serialize};

use crate::error::NumberingError;

/// Antibody numbering scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Imgt,
    Kabat,
}

impl Scheme {
    pub const ALL: [Scheme; 2] = [Scheme::Imgt, Scheme::Kabat];

    /// Name as passed to the numbering tool (`--scheme=imgt`).
    pub fn as_tool_arg(&self) -> &'static str {
        match self {
            Scheme::Imgt => "imgt",
            Scheme::Kabat => "kabat",
        }
    }

    /// Suffix used in region field names (`CDR1_IMGT`, `CDR1_Kabat`).
    pub fn field_suffix(&self) -> &'static str {
        match self {
            Scheme::Imgt => "IMGT",
            Scheme::Kabat => "Kabat",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "imgt" => Some(Scheme::Imgt),
            "kabat" => Some(Scheme::Kabat),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_tool_arg())
    }
}

/// Chain type of a numbered domain, as reported by the numbering tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainType {
    Heavy,
    Kappa,
    Lambda,
}

impl ChainType {
    /// Parse the single-letter chain code emitted in the tool metadata.
    pub fn from_code(code: &str) -> Result<Self, NumberingError> {
        match code.trim() {
            "H" => Ok(ChainType::Heavy),
            "K" => Ok(ChainType::Kappa),
            "L" => Ok(ChainType::Lambda),
            other => Err(NumberingError::UnsupportedChainType(other.to_string())),
        }
    }

    pub fn code(&self) -> char {
        match self {
            ChainType::Heavy => 'H',
            ChainType::Kappa => 'K',
            ChainType::Lambda => 'L',
        }
    }

    pub fn is_light(&self) -> bool {
        matches!(self, ChainType::Kappa | ChainType::Lambda)
    }
}

impl std::fmt::Display for ChainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainType::Heavy => write!(f, "heavy"),
            ChainType::Kappa => write!(f, "kappa"),
            ChainType::Lambda => write!(f, "lambda"),
        }
    }
}

/// Chain restriction handed to the numbering tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainRestriction {
    Heavy,
    Light,
    Kappa,
    Lambda,
}

impl ChainRestriction {
    /// Map a registry chain/function label onto a tool restriction.
    ///
    /// Returns `None` when the label imposes no restriction. Labels outside the
    /// known vocabulary are dropped with a warning rather than forwarded.
    pub fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        match trimmed {
            "H" | "VH" | "HC" => Some(ChainRestriction::Heavy),
            "K" => Some(ChainRestriction::Kappa),
            "L" => Some(ChainRestriction::Lambda),
            "LC" | "LC-kappa" | "LC-lambda" | "VL" | "VL-kappa" | "VL-lambda" => {
                Some(ChainRestriction::Light)
            }
            _ => match trimmed.to_lowercase().as_str() {
                "heavy" => Some(ChainRestriction::Heavy),
                "light" => Some(ChainRestriction::Light),
                "kappa" => Some(ChainRestriction::Kappa),
                "lambda" => Some(ChainRestriction::Lambda),
                "ig" | "" => None,
                _ => {
                    tracing::warn!(label = trimmed, "no chain restriction known for label, ignoring");
                    None
                }
            },
        }
    }

    /// Value passed to the tool's `--restrict` flag.
    pub fn as_tool_arg(&self) -> &'static str {
        match self {
            ChainRestriction::Heavy => "heavy",
            ChainRestriction::Light => "light",
            ChainRestriction::Kappa => "K",
            ChainRestriction::Lambda => "L",
        }
    }
}

/// Species accepted by the numbering tool's `--use_species` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Human,
    Mouse,
    Rat,
    Rabbit,
    Rhesus,
    Pig,
    Alpaca,
    Cow,
}

impl Species {
    pub const ALL: [Species; 8] = [
        Species::Human,
        Species::Mouse,
        Species::Rat,
        Species::Rabbit,
        Species::Rhesus,
        Species::Pig,
        Species::Alpaca,
        Species::Cow,
    ];

    pub fn as_tool_arg(&self) -> &'static str {
        match self {
            Species::Human => "human",
            Species::Mouse => "mouse",
            Species::Rat => "rat",
            Species::Rabbit => "rabbit",
            Species::Rhesus => "rhesus",
            Species::Pig => "pig",
            Species::Alpaca => "alpaca",
            Species::Cow => "cow",
        }
    }

    /// Normalise a laboratory species label (e.g. "Homo Sapiens") to a tool species.
    ///
    /// Known labels without a tool model (camelids other than alpaca, chimeras)
    /// resolve to `None` silently; unknown labels resolve to `None` with a warning.
    pub fn normalize(label: &str) -> Option<Self> {
        let lower = label.trim().to_lowercase();
        match lower.as_str() {
            "homo sapiens" | "humanized" => Some(Species::Human),
            "mus musculus" => Some(Species::Mouse),
            "rattus norvegicus" => Some(Species::Rat),
            "vicugna pacos" => Some(Species::Alpaca),
            "camelus dromedarius" | "lama glama" | "n/a" | "human-mouse chimera" | "" => None,
            other => {
                let found = Species::ALL
                    .iter()
                    .copied()
                    .find(|s| s.as_tool_arg() == other);
                if found.is_none() {
                    tracing::warn!(species = label, "no numbering species found, leaving unspecified");
                }
                found
            }
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_tool_arg())
    }
}

/// Framework and complementarity-determining regions, N- to C-terminus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "FR1")]
    Fr1,
    #[serde(rename = "CDR1")]
    Cdr1,
    #[serde(rename = "FR2")]
    Fr2,
    #[serde(rename = "CDR2")]
    Cdr2,
    #[serde(rename = "FR3")]
    Fr3,
    #[serde(rename = "CDR3")]
    Cdr3,
    #[serde(rename = "FR4")]
    Fr4,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::Fr1,
        Region::Cdr1,
        Region::Fr2,
        Region::Cdr2,
        Region::Fr3,
        Region::Cdr3,
        Region::Fr4,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Region::Fr1 => "FR1",
            Region::Cdr1 => "CDR1",
            Region::Fr2 => "FR2",
            Region::Cdr2 => "CDR2",
            Region::Fr3 => "FR3",
            Region::Cdr3 => "CDR3",
            Region::Fr4 => "FR4",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A region qualified by the scheme that defined it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionLabel {
    pub region: Region,
    pub scheme: Scheme,
}

impl RegionLabel {
    pub fn new(region: Region, scheme: Scheme) -> Self {
        Self { region, scheme }
    }

    /// Every label of both schemes, IMGT first.
    pub fn all() -> impl Iterator<Item = RegionLabel> {
        Scheme::ALL
            .into_iter()
            .flat_map(|scheme| Region::ALL.into_iter().map(move |r| RegionLabel::new(r, scheme)))
    }

    /// Registry field name, e.g. `CDR1_IMGT`.
    pub fn field_name(&self) -> String {
        format!("{}_{}", self.region.name(), self.scheme.field_suffix())
    }
}

impl std::fmt::Display for RegionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.field_name())
    }
}
