use anyhow::Result;
use helix_core::{regions, ChainType, Scheme};

use super::print_json;
use crate::dto::ClassifyDto;

pub fn run(number: u32, chain: ChainType, scheme: Scheme) -> Result<()> {
    let region = regions::classify(number, chain, scheme)?;
    print_json(&ClassifyDto {
        number,
        chain: chain.to_string(),
        scheme: scheme.field_suffix().to_string(),
        region: region.name().to_string(),
    })
}
