use std::path::Path;

use anyhow::{bail, Context, Result};
use helix_core::{AnnotationResult, Scheme};
use helix_formats::{detect, ParsedFile};

use super::{print_json, read_file};
use crate::dto::{AnnotationDto, IgBlastDto, SequenceDto};

pub fn run(path: &Path, scheme: Option<Scheme>) -> Result<()> {
    let content = read_file(path)?;

    let parsed = helix_formats::parse_file(&content).or_else(|err| {
        // Content sniffing failed; trust the extension if it names a known format.
        let by_extension = detect::detect_format_from_extension(&path.to_string_lossy());
        tracing::debug!(format = ?by_extension, "falling back to extension");
        match by_extension {
            helix_formats::FileFormat::Fasta => {
                helix_formats::fasta::parse(&content).map(ParsedFile::Sequences)
            }
            helix_formats::FileFormat::AnarciNumbering => {
                helix_formats::anarci::parse(&content).map(ParsedFile::Numbering)
            }
            helix_formats::FileFormat::IgBlast => {
                helix_formats::igblast::parse(&content).map(ParsedFile::IgBlast)
            }
            helix_formats::FileFormat::Unknown => Err(err),
        }
    });
    let parsed = parsed.with_context(|| format!("Failed to parse {}", path.display()))?;

    match parsed {
        ParsedFile::Numbering(numbering) => {
            let scheme = match scheme.or(numbering.metadata.scheme) {
                Some(scheme) => scheme,
                None => bail!("{} does not announce its scheme; pass --scheme", path.display()),
            };
            let result = AnnotationResult::from_numbering(&numbering, scheme)?;
            print_json(&AnnotationDto::from(&result))
        }
        ParsedFile::Sequences(sequences) => {
            let dtos: Vec<SequenceDto> = sequences.iter().map(SequenceDto::from).collect();
            print_json(&dtos)
        }
        ParsedFile::IgBlast(report) => {
            print_json(&IgBlastDto::new(&path.display().to_string(), &report, None)?)
        }
    }
}
