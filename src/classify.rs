use crate::allele::complement;
use crate::error::Result;
use crate::model::{Category, Genotype, ReferenceVariant, ScoreEntry, Strand, UserCall};

fn match_genotype(variant: &ReferenceVariant, genotype: &Genotype) -> Option<Category> {
    let heterozygote = Genotype::new(variant.out_of_africa, variant.ancestral);
    if *genotype == Genotype::homozygous(variant.out_of_africa) {
        Some(Category::HomozygousArchaic)
    } else if *genotype == Genotype::homozygous(variant.ancestral) {
        Some(Category::HomozygousModern)
    } else if genotype.same_alleles(&heterozygote) {
        Some(Category::Heterozygous)
    } else {
        None
    }
}

/// Score one user call against a reference variant.
///
/// The call is tried as reported and, failing that, once more on the
/// complementary strand. A call that matches on neither strand is
/// [`Category::Unresolved`] and contributes nothing to the score. The
/// returned entry carries no imputation provenance; the caller sets it.
pub fn classify(variant: &ReferenceVariant, call: &UserCall) -> Result<ScoreEntry> {
    let mut genotype = call.genotype;
    let mut category = Category::Unresolved;
    let mut strand = Strand::Forward;

    for attempt in [Strand::Forward, Strand::Reverse] {
        if attempt == Strand::Reverse {
            genotype = complement(genotype)?;
        }
        strand = attempt;
        if let Some(matched) = match_genotype(variant, &genotype) {
            category = matched;
            break;
        }
    }

    Ok(ScoreEntry {
        rsid: call.rsid.clone(),
        chromosome: variant.chromosome.clone(),
        position: variant.position,
        ancestral: variant.ancestral,
        out_of_africa: variant.out_of_africa,
        user_alleles: genotype,
        strand,
        category,
        score: category.score(),
        imputed_from: None,
    })
}
