pub mod anarci;
pub mod detect;
pub mod fasta;
pub mod igblast;

use helix_core::{AntibodySequence, Numbering};
use thiserror::Error;

use crate::igblast::IgBlastReport;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed metadata: {0}")]
    MalformedMetadata(String),
    #[error("Malformed numbering at line {line}: {reason}")]
    MalformedNumbering { line: usize, reason: String },
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Fasta,
    AnarciNumbering,
    IgBlast,
    Unknown,
}

/// Content of a parsed file, by detected format.
#[derive(Debug, Clone)]
pub enum ParsedFile {
    Sequences(Vec<AntibodySequence>),
    Numbering(Numbering),
    IgBlast(IgBlastReport),
}

/// Parse a file based on detected format
pub fn parse_file(content: &str) -> Result<ParsedFile, ParseError> {
    match detect::detect_format(content) {
        FileFormat::Fasta => fasta::parse(content).map(ParsedFile::Sequences),
        FileFormat::AnarciNumbering => anarci::parse(content).map(ParsedFile::Numbering),
        FileFormat::IgBlast => igblast::parse(content).map(ParsedFile::IgBlast),
        FileFormat::Unknown => Err(ParseError::InvalidFormat(
            "Unsupported or unrecognized file format".to_string(),
        )),
    }
}
