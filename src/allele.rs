use crate::error::{CustomError, Result};
use crate::model::Genotype;

fn complement_base(base: char) -> Option<char> {
    match base {
        'A' => Some('T'),
        'T' => Some('A'),
        'C' => Some('G'),
        'G' => Some('C'),
        _ => None,
    }
}

/// Genotype as it would be reported from the opposite strand.
pub fn complement(genotype: Genotype) -> Result<Genotype> {
    let [a, b] = genotype.alleles();
    let flip = |base: char| {
        complement_base(base).ok_or_else(|| CustomError::InvalidBase {
            base,
            genotype: genotype.to_string(),
        })
    };
    Ok(Genotype::new(flip(a)?, flip(b)?))
}
