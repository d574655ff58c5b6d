use helix_core::{AnnotationResult, ChainType, Region, Scheme};
use helix_formats::{anarci, detect, FileFormat};
use pretty_assertions::assert_eq;

const HEAVY_IMGT: &str = include_str!("fixtures/heavy_imgt.anarci");
const HEAVY_KABAT: &str = include_str!("fixtures/heavy_kabat.anarci");

const VH4_34: &str = "QVQLQQWGAGLLKPSETLSLTCAVYGGFFSGYYWSWIRQPPGKGLEWIGEINHSGSTNYNPSLKSRVTISVETSKNQFSLKLSSVTAADTAVYYCARDKWTWYFDLWGRGTLVTVSS";

fn regions(result: &AnnotationResult) -> Vec<(Region, &str)> {
    Region::ALL
        .iter()
        .map(|r| (*r, result.region(*r).unwrap_or("")))
        .collect()
}

#[test]
fn test_detects_numbering_output() {
    assert_eq!(detect::detect_format(HEAVY_IMGT), FileFormat::AnarciNumbering);
    assert_eq!(detect::detect_format(HEAVY_KABAT), FileFormat::AnarciNumbering);
}

#[test]
fn test_heavy_imgt_metadata() {
    let numbering = anarci::parse(HEAVY_IMGT).unwrap();
    let meta = &numbering.metadata;
    assert_eq!(meta.species, "human");
    assert_eq!(meta.chain().unwrap(), ChainType::Heavy);
    assert_eq!(meta.seqstart_index, 0);
    assert_eq!(meta.seqend_index, 116);
    assert_eq!(meta.scheme, Some(Scheme::Imgt));

    let germline = meta.germline.as_ref().expect("germline block");
    assert_eq!(germline.v_gene, "IGHV4-34*01");
    assert_eq!(germline.j_gene, "IGHJ2*01");
}

#[test]
fn test_heavy_imgt_regions() {
    let numbering = anarci::parse(HEAVY_IMGT).unwrap();
    // IMGT emits every position 1..=128, gaps included.
    assert_eq!(numbering.residues.len(), 128);

    let result = AnnotationResult::from_numbering(&numbering, Scheme::Imgt).unwrap();
    assert_eq!(
        regions(&result),
        vec![
            (Region::Fr1, "QVQLQQWGAGLLKPSETLSLTCAVY"),
            (Region::Cdr1, "GGFFSGYY"),
            (Region::Fr2, "WSWIRQPPGKGLEWIGE"),
            (Region::Cdr2, "INHSGST"),
            (Region::Fr3, "NYNPSLKSRVTISVETSKNQFSLKLSSVTAADTAVYYC"),
            (Region::Cdr3, "ARDKWTWYFDL"),
            (Region::Fr4, "WGRGTLVTVSS"),
        ]
    );

    let joined: String = result.regions.values().cloned().collect();
    assert_eq!(joined, VH4_34);
}

#[test]
fn test_heavy_kabat_regions_with_insertions() {
    let numbering = anarci::parse(HEAVY_KABAT).unwrap();
    assert_eq!(numbering.metadata.scheme, Some(Scheme::Kabat));
    assert!(numbering.metadata.germline.is_none());

    let lettered: Vec<String> = numbering
        .residues
        .iter()
        .filter(|r| r.insertion_letter.is_some() && !r.residue.is_gap())
        .map(|r| r.position_label())
        .collect();
    assert_eq!(lettered, vec!["82A", "82B", "82C", "100A"]);

    let result = AnnotationResult::from_numbering(&numbering, Scheme::Kabat).unwrap();
    assert_eq!(
        regions(&result),
        vec![
            (Region::Fr1, "QVQLQQWGAGLLKPSETLSLTCAVYGGFFS"),
            (Region::Cdr1, "GYYWS"),
            (Region::Fr2, "WIRQPPGKGLEWIG"),
            (Region::Cdr2, "EINHSGSTNYNPSLKS"),
            (Region::Fr3, "RVTISVETSKNQFSLKLSSVTAADTAVYYCAR"),
            (Region::Cdr3, "DKWTWYFDL"),
            (Region::Fr4, "WGRGTLVTVSS"),
        ]
    );
}

#[test]
fn test_same_sequence_under_both_schemes() {
    let imgt = AnnotationResult::from_numbering(&anarci::parse(HEAVY_IMGT).unwrap(), Scheme::Imgt)
        .unwrap();
    let kabat =
        AnnotationResult::from_numbering(&anarci::parse(HEAVY_KABAT).unwrap(), Scheme::Kabat)
            .unwrap();

    // Kabat CDR3 excludes the leading "AR" IMGT places in CDR3.
    assert_eq!(imgt.region(Region::Cdr3), Some("ARDKWTWYFDL"));
    assert_eq!(kabat.region(Region::Cdr3), Some("DKWTWYFDL"));
    assert_eq!(imgt.region(Region::Fr4), kabat.region(Region::Fr4));
}

#[test]
fn test_imgt_cdr3_insertions_keep_emission_order() {
    // IMGT numbers CDR3 insertions symmetrically: 111 grows forward, 112 backward.
    let output = "# long_cdr3
#|species|chain_type|e-value|score|seqstart_index|seqend_index|
#|human|H|1.2e-20|80.4|0|16|
H 105       A
H 106       R
H 107       D
H 108       K
H 109       W
H 110       T
H 111       Y
H 111     A C
H 111     B E
H 112     B F
H 112     A G
H 112       H
H 113       L
H 114       M
H 115       N
H 116       P
H 117       Q
//
";
    let numbering = anarci::parse(output).unwrap();
    let labels: Vec<String> = numbering.residues[6..12]
        .iter()
        .map(|r| r.position_label())
        .collect();
    assert_eq!(labels, vec!["111", "111A", "111B", "112B", "112A", "112"]);

    let result = AnnotationResult::from_numbering(&numbering, Scheme::Imgt).unwrap();
    assert_eq!(result.region(Region::Cdr3), Some("ARDKWTYCEFGHLMNPQ"));
}
