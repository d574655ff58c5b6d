//! Reader for the numbering tool's plain-text output.
//!
//! ```text
//! # ANARCI numbered
//! # Domain 1 of 1
//! # Most significant HMM hit
//! #|species|chain_type|e-value|score|seqstart_index|seqend_index|
//! #|mouse|K|2.2e-54|174.1|0|109|
//! # Scheme = kabat
//! L 1       D
//! L 27    A S
//! //
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use helix_core::{GermlineHit, Numbering, NumberingMetadata, Residue, ResidueNumbering, Scheme};
use nom::{
    character::complete::{digit1, satisfy, space0, space1},
    combinator::{eof, map_res, opt},
    sequence::preceded,
    IResult,
};
use regex::Regex;

use crate::ParseError;

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "species",
    "chain_type",
    "e-value",
    "score",
    "seqstart_index",
    "seqend_index",
];

const GERMLINE_COLUMNS: [&str; 5] = ["species", "v_gene", "v_identity", "j_gene", "j_identity"];

static SCHEME_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s*Scheme\s*=\s*(\w+)").expect("valid scheme regex"));

/// Parse one sequence's numbering output into residue records and metadata.
pub fn parse(output: &str) -> Result<Numbering, ParseError> {
    let lines: Vec<&str> = output.lines().collect();

    let mut metadata = parse_metadata(&lines)?;
    metadata.scheme = parse_scheme(&lines);
    metadata.germline = parse_germline(&lines)?;
    let residues = parse_residues(&lines)?;

    tracing::debug!(
        residues = residues.len(),
        chain_type = %metadata.chain_type,
        "parsed numbering output"
    );

    Ok(Numbering { residues, metadata })
}

/// Split a `#|a|b|c|` row into its cells. Returns `None` for any other line.
fn pipe_cells(line: &str) -> Option<Vec<&str>> {
    let inner = line.trim().strip_prefix("#|")?;
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    Some(inner.split('|').map(str::trim).collect())
}

/// Locate the pipe header containing `marker` and zip it with the row that follows.
fn pipe_table<'a>(
    lines: &[&'a str],
    marker: &str,
) -> Result<Option<HashMap<&'a str, &'a str>>, ParseError> {
    let Some(header_idx) = lines
        .iter()
        .position(|line| pipe_cells(line).is_some_and(|cells| cells.contains(&marker)))
    else {
        return Ok(None);
    };

    let headers = pipe_cells(lines[header_idx]).unwrap_or_default();
    let values = lines
        .get(header_idx + 1)
        .copied()
        .and_then(pipe_cells)
        .ok_or_else(|| {
            ParseError::MalformedMetadata(format!(
                "header at line {} is not followed by a value row",
                header_idx + 1
            ))
        })?;

    if headers.len() != values.len() {
        return Err(ParseError::MalformedMetadata(format!(
            "header has {} columns but value row has {}",
            headers.len(),
            values.len()
        )));
    }

    Ok(Some(headers.into_iter().zip(values).collect()))
}

fn require_columns(table: &HashMap<&str, &str>, columns: &[&str]) -> Result<(), ParseError> {
    let missing: Vec<&str> = columns
        .iter()
        .copied()
        .filter(|c| !table.contains_key(c))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ParseError::MalformedMetadata(format!(
            "missing required columns: {}",
            missing.join(", ")
        )))
    }
}

fn numeric<T: std::str::FromStr>(table: &HashMap<&str, &str>, field: &str) -> Result<T, ParseError> {
    let raw = table.get(field).copied().unwrap_or_default();
    raw.parse().map_err(|_| {
        ParseError::MalformedMetadata(format!("field `{field}` is not numeric: {raw:?}"))
    })
}

/// Extract the most significant domain hit metadata.
pub fn parse_metadata(lines: &[&str]) -> Result<NumberingMetadata, ParseError> {
    let table = pipe_table(lines, "chain_type")?.ok_or_else(|| {
        ParseError::MalformedMetadata("no domain metadata header found (no antibody domain?)".to_string())
    })?;
    require_columns(&table, &REQUIRED_COLUMNS)?;

    Ok(NumberingMetadata {
        species: table["species"].to_string(),
        chain_type: table["chain_type"].to_string(),
        e_value: numeric(&table, "e-value")?,
        score: numeric(&table, "score")?,
        seqstart_index: numeric(&table, "seqstart_index")?,
        seqend_index: numeric(&table, "seqend_index")?,
        scheme: None,
        germline: None,
        tool_version: None,
        tool_source: None,
    })
}

fn parse_scheme(lines: &[&str]) -> Option<Scheme> {
    lines
        .iter()
        .find_map(|line| SCHEME_LINE.captures(line))
        .and_then(|caps| Scheme::from_name(&caps[1]))
}

/// Germline assignment block, present when the tool was asked to assign germlines.
pub fn parse_germline(lines: &[&str]) -> Result<Option<GermlineHit>, ParseError> {
    let Some(table) = pipe_table(lines, "v_gene")? else {
        return Ok(None);
    };
    require_columns(&table, &GERMLINE_COLUMNS)?;

    Ok(Some(GermlineHit {
        species: table["species"].to_string(),
        v_gene: table["v_gene"].to_string(),
        v_identity: numeric(&table, "v_identity")?,
        j_gene: table["j_gene"].to_string(),
        j_identity: numeric(&table, "j_identity")?,
    }))
}

fn token(input: &str) -> IResult<&str, char> {
    satisfy(|c| !c.is_whitespace())(input)
}

fn position(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |s: &str| s.parse::<u32>())(input)
}

/// `type number [insertion] amino_acid`
fn numbering_line(input: &str) -> IResult<&str, ResidueNumbering> {
    let (input, _) = space0(input)?;
    let (input, position_type) = token(input)?;
    let (input, number) = preceded(space1, position)(input)?;
    let (input, first) = preceded(space1, token)(input)?;
    let (input, second) = opt(preceded(space1, token))(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = eof(input)?;

    // The amino acid is always the last field.
    let record = match second {
        Some(aa) => ResidueNumbering::new(position_type, number, Residue::from_char(aa))
            .with_insertion(first),
        None => ResidueNumbering::new(position_type, number, Residue::from_char(first)),
    };
    Ok((input, record))
}

/// Read the data lines up to the `//` terminator, skipping comments.
pub fn parse_residues(lines: &[&str]) -> Result<Vec<ResidueNumbering>, ParseError> {
    let mut residues = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with("//") {
            break;
        }
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields = trimmed.split_whitespace().count();
        if !(3..=4).contains(&fields) {
            return Err(ParseError::MalformedNumbering {
                line: idx + 1,
                reason: format!("expected 3 or 4 fields, found {fields}"),
            });
        }

        let (_, record) = numbering_line(trimmed).map_err(|e| ParseError::MalformedNumbering {
            line: idx + 1,
            reason: format!("{trimmed:?}: {e}"),
        })?;
        residues.push(record);
    }

    Ok(residues)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KAPPA_OUTPUT: &str = "# test
# ANARCI numbered
# Domain 1 of 1
# Most significant HMM hit
#|species|chain_type|e-value|score|seqstart_index|seqend_index|
#|mouse|K|2.2e-54|174.1|0|109|
# Scheme = kabat
L 1       D
L 2       I
L 10      -
L 81      L
L 82    A K
L 82    B S
L 82    C L
//
";

    #[test]
    fn test_parse_metadata() {
        let numbering = parse(KAPPA_OUTPUT).unwrap();
        let meta = &numbering.metadata;
        assert_eq!(meta.species, "mouse");
        assert_eq!(meta.chain_type, "K");
        assert_eq!(meta.e_value, 2.2e-54);
        assert_eq!(meta.score, 174.1);
        assert_eq!(meta.seqstart_index, 0);
        assert_eq!(meta.seqend_index, 109);
        assert_eq!(meta.scheme, Some(Scheme::Kabat));
        assert!(meta.germline.is_none());
    }

    #[test]
    fn test_parse_residues() {
        let numbering = parse(KAPPA_OUTPUT).unwrap();
        let residues = &numbering.residues;
        assert_eq!(residues.len(), 7);
        assert_eq!(residues[0], ResidueNumbering::new('L', 1, Residue::Amino('D')));
        assert!(residues[2].residue.is_gap());

        let inserted: Vec<(Option<char>, Option<char>)> = residues[4..]
            .iter()
            .map(|r| (r.insertion_letter, r.residue.amino_acid()))
            .collect();
        assert_eq!(
            inserted,
            vec![(Some('A'), Some('K')), (Some('B'), Some('S')), (Some('C'), Some('L'))]
        );
    }

    #[test]
    fn test_header_columns_in_any_order() {
        let output = "#|chain_type|seqend_index|species|score|seqstart_index|e-value|
#|H|117|human|177.6|0|1.6e-55|
H 1       Q
//
";
        let meta = parse(output).unwrap().metadata;
        assert_eq!(meta.chain_type, "H");
        assert_eq!(meta.species, "human");
        assert_eq!(meta.seqend_index, 117);
        assert_eq!(meta.e_value, 1.6e-55);
    }

    #[test]
    fn test_short_value_row_is_rejected() {
        let output = "#|species|chain_type|e-value|score|seqstart_index|seqend_index|
#|mouse|K|2.2e-54|174.1|0|
L 1       D
//
";
        assert!(matches!(parse(output), Err(ParseError::MalformedMetadata(_))));
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let output = "#|species|chain_type|e-value|seqstart_index|seqend_index|
#|mouse|K|2.2e-54|0|109|
//
";
        match parse(output) {
            Err(ParseError::MalformedMetadata(msg)) => assert!(msg.contains("score")),
            other => panic!("expected MalformedMetadata, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_field_names_field() {
        let output = "#|species|chain_type|e-value|score|seqstart_index|seqend_index|
#|mouse|K|2.2e-54|high|0|109|
//
";
        match parse(output) {
            Err(ParseError::MalformedMetadata(msg)) => assert!(msg.contains("`score`")),
            other => panic!("expected MalformedMetadata, got {other:?}"),
        }
    }

    #[test]
    fn test_no_domain_found() {
        let output = "# Input sequence\n# ANARCI numbered\n//\n";
        assert!(matches!(parse(output), Err(ParseError::MalformedMetadata(_))));
    }

    #[test]
    fn test_bad_field_count() {
        let output = "#|species|chain_type|e-value|score|seqstart_index|seqend_index|
#|mouse|K|2.2e-54|174.1|0|109|
L 1
//
";
        assert!(matches!(
            parse(output),
            Err(ParseError::MalformedNumbering { line: 3, .. })
        ));
    }

    #[test]
    fn test_non_numeric_position() {
        let output = "#|species|chain_type|e-value|score|seqstart_index|seqend_index|
#|mouse|K|2.2e-54|174.1|0|109|
L x D
//
";
        assert!(matches!(
            parse(output),
            Err(ParseError::MalformedNumbering { line: 3, .. })
        ));
    }

    #[test]
    fn test_lines_after_terminator_ignored() {
        let output = "#|species|chain_type|e-value|score|seqstart_index|seqend_index|
#|human|H|1e-50|150.0|0|120|
H 1       E
//
garbage that is not numbering
";
        assert_eq!(parse(output).unwrap().residues.len(), 1);
    }

    #[test]
    fn test_germline_block() {
        let output = "#|species|chain_type|e-value|score|seqstart_index|seqend_index|
#|human|H|1.6e-55|177.6|0|117|
# Most sig germline hits
#|species|v_gene|v_identity|j_gene|j_identity|
#|human|IGHV3-23*04|0.83|IGHJ4*01|0.93|
# Scheme = imgt
H 1       E
//
";
        let meta = parse(output).unwrap().metadata;
        let germline = meta.germline.unwrap();
        assert_eq!(germline.v_gene, "IGHV3-23*04");
        assert_eq!(germline.j_identity, 0.93);
        assert_eq!(meta.scheme, Some(Scheme::Imgt));
    }
}
