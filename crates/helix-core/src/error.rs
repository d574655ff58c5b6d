use thiserror::Error;

use crate::scheme::Scheme;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberingError {
    #[error("Unsupported chain type: {0:?} (expected H, K or L)")]
    UnsupportedChainType(String),
    #[error("Position {number} is outside every {scheme} region for chain {chain}")]
    UnclassifiedPosition {
        number: u32,
        chain: char,
        scheme: Scheme,
    },
}
