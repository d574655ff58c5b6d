//! IMGT and Kabat framework/CDR boundaries.
//!
//! IMGT: https://www.imgt.org/IMGTScientificChart/Nomenclature/IMGT-FRCDRdefinition.html
//! Kabat: http://www.bioinf.org.uk/abs/info.html

use crate::error::NumberingError;
use crate::scheme::{ChainType, Region, Scheme};

/// Closed interval `[start, end]`; `end == None` is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub start: u32,
    pub end: Option<u32>,
    pub region: Region,
}

const fn b(start: u32, end: Option<u32>, region: Region) -> Boundary {
    Boundary { start, end, region }
}

const IMGT_LIGHT: [Boundary; 7] = [
    b(1, Some(35), Region::Fr1),
    b(36, Some(40), Region::Cdr1),
    b(41, Some(54), Region::Fr2),
    b(55, Some(74), Region::Cdr2),
    b(75, Some(104), Region::Fr3),
    b(105, Some(117), Region::Cdr3),
    b(118, None, Region::Fr4),
];

// FR4 stops at 129 for heavy chains only.
const IMGT_HEAVY: [Boundary; 7] = [
    b(1, Some(26), Region::Fr1),
    b(27, Some(38), Region::Cdr1),
    b(39, Some(55), Region::Fr2),
    b(56, Some(65), Region::Cdr2),
    b(66, Some(104), Region::Fr3),
    b(105, Some(117), Region::Cdr3),
    b(118, Some(129), Region::Fr4),
];

const KABAT_LIGHT: [Boundary; 7] = [
    b(1, Some(23), Region::Fr1),
    b(24, Some(34), Region::Cdr1),
    b(35, Some(49), Region::Fr2),
    b(50, Some(56), Region::Cdr2),
    b(57, Some(88), Region::Fr3),
    b(89, Some(97), Region::Cdr3),
    b(98, None, Region::Fr4),
];

const KABAT_HEAVY: [Boundary; 7] = [
    b(1, Some(30), Region::Fr1),
    b(31, Some(35), Region::Cdr1),
    b(36, Some(49), Region::Fr2),
    b(50, Some(65), Region::Cdr2),
    b(66, Some(94), Region::Fr3),
    b(95, Some(102), Region::Cdr3),
    b(103, None, Region::Fr4),
];

/// Boundary table for a scheme and chain. Kappa and lambda share a table.
pub fn boundaries(scheme: Scheme, chain: ChainType) -> &'static [Boundary; 7] {
    match (scheme, chain.is_light()) {
        (Scheme::Imgt, true) => &IMGT_LIGHT,
        (Scheme::Imgt, false) => &IMGT_HEAVY,
        (Scheme::Kabat, true) => &KABAT_LIGHT,
        (Scheme::Kabat, false) => &KABAT_HEAVY,
    }
}

/// Classify a scheme position into its framework/CDR region.
pub fn classify(number: u32, chain: ChainType, scheme: Scheme) -> Result<Region, NumberingError> {
    let table = boundaries(scheme, chain);
    // Tables are sorted and contiguous: find the last interval starting at or before `number`.
    let idx = table.partition_point(|bound| bound.start <= number);
    let unclassified = NumberingError::UnclassifiedPosition {
        number,
        chain: chain.code(),
        scheme,
    };

    if idx == 0 {
        return Err(unclassified);
    }
    let bound = &table[idx - 1];
    match bound.end {
        Some(end) if number > end => Err(unclassified),
        _ => Ok(bound.region),
    }
}
