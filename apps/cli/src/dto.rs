//! Flat, JSON-friendly DTOs for command output.

use std::collections::BTreeMap;

use helix_annotator::{AnnotatedEntry, BatchReport, FailedEntry};
use helix_core::{AnnotationResult, AntibodySequence, DualAnnotation, NumberingMetadata};
use helix_formats::igblast::IgBlastReport;
use helix_formats::ParseError;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyDto {
    pub number: u32,
    pub chain: String,
    pub scheme: String,
    pub region: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDto {
    pub species: String,
    pub chain_type: String,
    pub e_value: f64,
    pub score: f64,
    pub seqstart_index: usize,
    pub seqend_index: usize,
    pub v_gene: Option<String>,
    pub j_gene: Option<String>,
    pub tool_version: Option<String>,
    pub tool_source: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationDto {
    pub scheme: String,
    pub chain_type: String,
    /// Keyed by field name, e.g. `CDR3_IMGT`.
    pub regions: BTreeMap<String, String>,
    pub metadata: MetadataDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct DualAnnotationDto {
    pub id: String,
    pub fields: BTreeMap<String, String>,
    pub imgt: MetadataDto,
    pub kabat: MetadataDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureDto {
    pub id: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReportDto {
    pub run_id: String,
    pub annotated: Vec<DualAnnotationDto>,
    pub failed: Vec<FailureDto>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SequenceDto {
    pub id: String,
    pub name: String,
    pub length: usize,
    pub residues: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionSliceDto {
    pub region: String,
    pub sequence: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IgBlastDto {
    pub source: String,
    pub top_hit: Option<String>,
    pub identity: Option<f64>,
    pub regions: Vec<RegionSliceDto>,
}

// Conversion from domain types to DTOs
impl From<&NumberingMetadata> for MetadataDto {
    fn from(meta: &NumberingMetadata) -> Self {
        MetadataDto {
            species: meta.species.clone(),
            chain_type: meta.chain_type.clone(),
            e_value: meta.e_value,
            score: meta.score,
            seqstart_index: meta.seqstart_index,
            seqend_index: meta.seqend_index,
            v_gene: meta.germline.as_ref().map(|g| g.v_gene.clone()),
            j_gene: meta.germline.as_ref().map(|g| g.j_gene.clone()),
            tool_version: meta.tool_version.clone(),
            tool_source: meta.tool_source.clone(),
        }
    }
}

impl From<&AnnotationResult> for AnnotationDto {
    fn from(result: &AnnotationResult) -> Self {
        AnnotationDto {
            scheme: result.scheme.field_suffix().to_string(),
            chain_type: result.chain_type.to_string(),
            regions: result
                .labelled()
                .map(|(label, seq)| (label.field_name(), seq.to_string()))
                .collect(),
            metadata: MetadataDto::from(&result.metadata),
        }
    }
}

impl DualAnnotationDto {
    pub fn new(id: &str, annotation: &DualAnnotation) -> Self {
        DualAnnotationDto {
            id: id.to_string(),
            fields: annotation.fields(),
            imgt: MetadataDto::from(&annotation.imgt.metadata),
            kabat: MetadataDto::from(&annotation.kabat.metadata),
        }
    }
}

impl From<&AnnotatedEntry> for DualAnnotationDto {
    fn from(entry: &AnnotatedEntry) -> Self {
        DualAnnotationDto::new(&entry.id, &entry.annotation)
    }
}

impl From<&FailedEntry> for FailureDto {
    fn from(entry: &FailedEntry) -> Self {
        FailureDto {
            id: entry.id.clone(),
            error: entry.error.clone(),
        }
    }
}

impl From<&BatchReport> for BatchReportDto {
    fn from(report: &BatchReport) -> Self {
        BatchReportDto {
            run_id: report.run_id.to_string(),
            annotated: report.annotated.iter().map(DualAnnotationDto::from).collect(),
            failed: report.failed.iter().map(FailureDto::from).collect(),
            skipped: report.skipped.clone(),
        }
    }
}

impl From<&AntibodySequence> for SequenceDto {
    fn from(seq: &AntibodySequence) -> Self {
        SequenceDto {
            id: seq.id.clone(),
            name: seq.name.clone(),
            length: seq.len(),
            residues: seq.residues.clone(),
        }
    }
}

impl IgBlastDto {
    /// Summarise a report, slicing `sequence` into its regions when given.
    pub fn new(
        source: &str,
        report: &IgBlastReport,
        sequence: Option<&str>,
    ) -> Result<Self, ParseError> {
        let regions = match sequence {
            Some(seq) => helix_formats::igblast::split_regions(seq, report)?,
            None => Vec::new(),
        }
        .into_iter()
        .map(|(region, sequence)| RegionSliceDto { region, sequence })
        .collect();

        Ok(IgBlastDto {
            source: source.to_string(),
            top_hit: report
                .top_hit()
                .and_then(|hit| hit.subject_id())
                .map(str::to_string),
            identity: report.top_identity(),
            regions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_core::{
        ChainType, Numbering, Residue, ResidueNumbering, Scheme,
    };
    use pretty_assertions::assert_eq;

    fn metadata() -> NumberingMetadata {
        NumberingMetadata {
            species: "human".to_string(),
            chain_type: "H".to_string(),
            e_value: 1e-50,
            score: 150.0,
            seqstart_index: 0,
            seqend_index: 3,
            scheme: None,
            germline: None,
            tool_version: Some("1.3".to_string()),
            tool_source: None,
        }
    }

    #[test]
    fn test_annotation_dto_uses_field_names() {
        let numbering = Numbering {
            residues: vec![
                ResidueNumbering::new('H', 1, Residue::Amino('E')),
                ResidueNumbering::new('H', 2, Residue::Amino('V')),
                ResidueNumbering::new('H', 27, Residue::Amino('G')),
            ],
            metadata: metadata(),
        };
        let result = AnnotationResult::from_numbering(&numbering, Scheme::Kabat).unwrap();
        let dto = AnnotationDto::from(&result);

        assert_eq!(result.chain_type, ChainType::Heavy);
        assert_eq!(dto.scheme, "Kabat");
        let keys: Vec<&str> = dto.regions.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["FR1_Kabat"]);
        assert_eq!(dto.regions["FR1_Kabat"], "EVG");
        assert_eq!(dto.metadata.tool_version.as_deref(), Some("1.3"));
    }

    #[test]
    fn test_metadata_dto_is_camel_case() {
        let json = serde_json::to_value(MetadataDto::from(&metadata())).unwrap();
        assert!(json.get("eValue").is_some());
        assert!(json.get("seqstartIndex").is_some());
        assert_eq!(json["vGene"], serde_json::Value::Null);
    }
}
