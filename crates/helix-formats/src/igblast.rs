//! Reader for tabular (`-outfmt 7`) protein germline alignment reports.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ParseError;

const ALIGNMENT_SUMMARY: &str = "# Alignment summary between query and top germline V gene hit";
const FIELDS_PREFIX: &str = "# Fields: ";

static HITS_FOUND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s+\d+\s+hits found").expect("valid hits regex"));

/// One row of the V-gene alignment summary, e.g. `FR1-IMGT 1 25 ...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentRow {
    pub region: String,
    /// 1-based inclusive query start.
    pub from: usize,
    /// 1-based inclusive query end.
    pub to: usize,
    pub length: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub gaps: usize,
    pub percent_identity: f64,
}

/// A germline hit. `columns` follows the report's `# Fields:` line,
/// preceded by the hit's chain/database marker under the key `DB`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GermlineHitRow {
    pub columns: Vec<(String, String)>,
}

impl GermlineHitRow {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn subject_id(&self) -> Option<&str> {
        self.get("subject id")
    }

    pub fn percent_identity(&self) -> Option<f64> {
        self.get("% identity").and_then(|v| v.trim().parse().ok())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IgBlastReport {
    pub alignment: Vec<AlignmentRow>,
    pub hits: Vec<GermlineHitRow>,
}

impl IgBlastReport {
    /// Hit with the highest percent identity.
    pub fn top_hit(&self) -> Option<&GermlineHitRow> {
        self.hits
            .iter()
            .filter(|h| h.percent_identity().is_some())
            .max_by(|a, b| {
                a.percent_identity()
                    .partial_cmp(&b.percent_identity())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    pub fn top_identity(&self) -> Option<f64> {
        self.top_hit().and_then(GermlineHitRow::percent_identity)
    }
}

/// Parse a single-query report.
pub fn parse(input: &str) -> Result<IgBlastReport, ParseError> {
    let mut report = IgBlastReport::default();
    let mut fields: Vec<String> = vec!["DB".to_string()];
    let mut in_alignment = false;
    let mut in_hits = false;

    for (idx, line) in input.lines().enumerate() {
        if line.starts_with(ALIGNMENT_SUMMARY) {
            in_alignment = true;
            continue;
        }
        if in_alignment {
            if line.trim().is_empty() || line.starts_with("Total") {
                in_alignment = false;
            } else {
                report.alignment.push(parse_alignment_row(line, idx + 1)?);
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix(FIELDS_PREFIX) {
            fields.extend(rest.split(", ").map(|f| f.trim().to_string()));
        } else if HITS_FOUND.is_match(line) {
            in_hits = true;
        } else if in_hits {
            if line.trim().is_empty() || line.starts_with("# BLAST") {
                in_hits = false;
            } else {
                let cells = line.split('\t').map(|c| c.trim().to_string());
                report.hits.push(GermlineHitRow {
                    columns: fields.iter().cloned().zip(cells).collect(),
                });
            }
        }
    }

    if report.alignment.is_empty() && report.hits.is_empty() {
        return Err(ParseError::InvalidFormat(
            "no alignment summary or hit table found".to_string(),
        ));
    }

    Ok(report)
}

fn parse_alignment_row(line: &str, line_no: usize) -> Result<AlignmentRow, ParseError> {
    let cells: Vec<&str> = line.split('\t').map(str::trim).collect();
    if cells.len() < 8 {
        return Err(ParseError::InvalidFormat(format!(
            "alignment row at line {line_no} has {} columns, expected 8",
            cells.len()
        )));
    }

    let int = |i: usize| -> Result<usize, ParseError> {
        cells[i].parse().map_err(|_| {
            ParseError::InvalidFormat(format!(
                "alignment row at line {line_no}: {:?} is not an integer",
                cells[i]
            ))
        })
    };

    Ok(AlignmentRow {
        region: cells[0].to_string(),
        from: int(1)?,
        to: int(2)?,
        length: int(3)?,
        matches: int(4)?,
        mismatches: int(5)?,
        gaps: int(6)?,
        percent_identity: cells[7].parse().map_err(|_| {
            ParseError::InvalidFormat(format!(
                "alignment row at line {line_no}: {:?} is not a percentage",
                cells[7]
            ))
        })?,
    })
}

/// Cut the query into the regions of the alignment summary.
///
/// Coordinates are 1-based inclusive residue positions; ranges running past
/// the end of the query are clamped. The query must be single-letter amino
/// acid codes.
pub fn split_regions(
    sequence: &str,
    report: &IgBlastReport,
) -> Result<Vec<(String, String)>, ParseError> {
    if let Some(bad) = sequence.chars().find(|c| !c.is_ascii()) {
        return Err(ParseError::InvalidFormat(format!(
            "query contains non-ASCII residue {bad:?}"
        )));
    }

    Ok(report
        .alignment
        .iter()
        .map(|row| {
            let start = row.from.saturating_sub(1).min(sequence.len());
            let end = row.to.min(sequence.len()).max(start);
            (row.region.clone(), sequence[start..end].to_string())
        })
        .collect())
}

/// Pick the report whose top hit has the highest identity across chain databases.
pub fn best_report<'a, K>(reports: &'a [(K, IgBlastReport)]) -> Option<&'a (K, IgBlastReport)> {
    reports
        .iter()
        .filter(|(_, r)| r.top_identity().is_some())
        .max_by(|(_, a), (_, b)| {
            a.top_identity()
                .partial_cmp(&b.top_identity())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "# IGBLASTP 1.22.0
# Query: seq1
# Database: IGHV_clean

# Alignment summary between query and top germline V gene hit (from, to, length, matches, mismatches, gaps, percent identity)
FR1-IMGT\t1\t25\t25\t24\t1\t0\t96
CDR1-IMGT\t26\t33\t8\t6\t2\t0\t75
FR2-IMGT\t34\t50\t17\t17\t0\t0\t100
Total\tN/A\tN/A\t50\t47\t3\t0\t94

# Hit table (the first field indicates the chain type of the hit)
# Fields: query id, subject id, % identity, alignment length
# 2 hits found
V\tseq1\tIGHV3-23*01\t91.84\t98
V\tseq1\tIGHV3-30*02\t93.10\t98
# BLAST processed 1 queries
";

    #[test]
    fn test_parse_alignment_summary() {
        let report = parse(REPORT).unwrap();
        assert_eq!(report.alignment.len(), 3);
        assert_eq!(report.alignment[1].region, "CDR1-IMGT");
        assert_eq!(report.alignment[1].from, 26);
        assert_eq!(report.alignment[1].to, 33);
        assert_eq!(report.alignment[2].percent_identity, 100.0);
    }

    #[test]
    fn test_parse_hits() {
        let report = parse(REPORT).unwrap();
        assert_eq!(report.hits.len(), 2);
        assert_eq!(report.hits[0].get("DB"), Some("V"));
        assert_eq!(report.hits[0].subject_id(), Some("IGHV3-23*01"));
        assert_eq!(report.top_hit().unwrap().subject_id(), Some("IGHV3-30*02"));
        assert_eq!(report.top_identity(), Some(93.10));
    }

    #[test]
    fn test_split_regions() {
        let sequence = "EVQLLESGGGLVQPGGSLRLSCAASGFTFSSYAMSWVRQAPGKGLEWVS";
        let report = parse(REPORT).unwrap();
        let regions = split_regions(sequence, &report).unwrap();
        assert_eq!(regions[0], ("FR1-IMGT".to_string(), "EVQLLESGGGLVQPGGSLRLSCAAS".to_string()));
        assert_eq!(regions[1], ("CDR1-IMGT".to_string(), "GFTFSSYA".to_string()));
        // Query is one residue shorter than the alignment claims.
        assert_eq!(regions[2].1, "MSWVRQAPGKGLEWVS");
    }

    #[test]
    fn test_split_regions_rejects_non_ascii_query() {
        let report = parse(REPORT).unwrap();
        assert!(matches!(
            split_regions("ÉVQLLESGGG", &report),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_best_report() {
        let heavy = parse(REPORT).unwrap();
        let mut light = heavy.clone();
        light.hits.truncate(1);
        let reports = vec![("VL-kappa", light), ("VH", heavy)];
        assert_eq!(best_report(&reports).unwrap().0, "VH");
    }

    #[test]
    fn test_empty_report() {
        assert!(parse("# IGBLASTP 1.22.0\n# 0 hits found\n").is_err());
    }
}
