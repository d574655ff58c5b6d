use crate::FileFormat;

/// Auto-detect file format from content
pub fn detect_format(content: &str) -> FileFormat {
    let trimmed = content.trim_start();

    if trimmed.starts_with('>') {
        FileFormat::Fasta
    } else if trimmed.starts_with("# IGBLAST")
        || content.contains("# Alignment summary between query and top germline")
    {
        FileFormat::IgBlast
    } else if trimmed.starts_with('#')
        && content
            .lines()
            .any(|l| l.starts_with("#|") && l.contains("|chain_type|"))
    {
        FileFormat::AnarciNumbering
    } else {
        FileFormat::Unknown
    }
}

/// Detect format from file extension
pub fn detect_format_from_extension(path: &str) -> FileFormat {
    let lower = path.to_lowercase();
    if lower.ends_with(".fa")
        || lower.ends_with(".fasta")
        || lower.ends_with(".faa")
        || lower.ends_with(".fsa")
    {
        FileFormat::Fasta
    } else if lower.ends_with(".anarci") {
        FileFormat::AnarciNumbering
    } else if lower.ends_with(".igblast") || lower.ends_with(".fmt7") {
        FileFormat::IgBlast
    } else {
        FileFormat::Unknown
    }
}
