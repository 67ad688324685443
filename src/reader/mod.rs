pub mod genotype;
pub mod neighbors;
pub mod panel;

use crate::error::Result;
use crate::model::ReferenceVariant;

/// Source of reference-panel variants.
pub trait VariantRepository: Sync {
    fn fetch_all_rsids(&self) -> Result<Vec<String>>;
    fn fetch_variant(&self, rsid: &str) -> Result<ReferenceVariant>;
}
