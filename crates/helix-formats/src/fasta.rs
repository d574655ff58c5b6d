use helix_core::AntibodySequence;

use crate::ParseError;

/// Parse a FASTA format string into one or more antibody sequences.
///
/// The first word of the header becomes the record id, the remainder its name.
pub fn parse(input: &str) -> Result<Vec<AntibodySequence>, ParseError> {
    let mut sequences = Vec::new();
    let mut current_id: Option<String> = None;
    let mut current_name: Option<String> = None;
    let mut current_seq = String::new();

    for line in input.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        if let Some(header) = trimmed.strip_prefix('>') {
            // Save previous sequence if exists
            if let Some(id) = current_id.take() {
                push_record(
                    &mut sequences,
                    id,
                    current_name.take(),
                    std::mem::take(&mut current_seq),
                );
            }

            let mut parts = header.trim().splitn(2, char::is_whitespace);
            current_id = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
            current_name = parts.next().map(|s| s.trim().to_string());
            current_seq.clear();
        } else if trimmed.starts_with(';') {
            continue;
        } else {
            current_seq.extend(
                trimmed
                    .chars()
                    .filter(|c| c.is_ascii_alphabetic())
                    .map(|c| c.to_ascii_uppercase()),
            );
        }
    }

    // Don't forget the last sequence
    if let Some(id) = current_id {
        push_record(&mut sequences, id, current_name, current_seq);
    }

    if sequences.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequences found in FASTA input".to_string(),
        ));
    }

    Ok(sequences)
}

fn push_record(
    sequences: &mut Vec<AntibodySequence>,
    id: String,
    name: Option<String>,
    residues: String,
) {
    if residues.is_empty() {
        tracing::warn!(id = %id, "skipping FASTA record without residues");
        return;
    }
    let mut seq = AntibodySequence::new(id, residues);
    if let Some(name) = name {
        seq.name = name;
    }
    sequences.push(seq);
}

/// Serialize sequences to FASTA format
pub fn serialize(sequences: &[AntibodySequence]) -> String {
    let mut out = String::new();

    for seq in sequences {
        out.push('>');
        out.push_str(&seq.id);
        if !seq.name.is_empty() {
            out.push(' ');
            out.push_str(&seq.name);
        }
        out.push('\n');

        // Residues in 80-character lines
        for chunk in seq.residues.as_bytes().chunks(80) {
            out.push_str(&String::from_utf8_lossy(chunk));
            out.push('\n');
        }
    }

    out
}
