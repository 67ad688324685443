use crate::error::{CustomError, Result};
use crate::model::{Population, UserCall};
use crate::reader::genotype::GenotypeCalls;
use crate::reader::neighbors::NeighborTable;

/// Supplies a stand-in call for a panel variant missing from the user's data.
pub trait Imputer: Sync {
    fn impute(
        &self,
        known: &GenotypeCalls,
        rsid: &str,
        population: Population,
    ) -> Result<UserCall>;
}

/// Copies the genotype of the nearest neighbor the user was genotyped at.
pub struct NearestSnpImputer {
    neighbors: NeighborTable,
}

impl NearestSnpImputer {
    pub fn new(neighbors: NeighborTable) -> Self {
        Self { neighbors }
    }
}

impl Imputer for NearestSnpImputer {
    fn impute(
        &self,
        known: &GenotypeCalls,
        rsid: &str,
        population: Population,
    ) -> Result<UserCall> {
        self.neighbors
            .candidates(population, rsid)
            .find_map(|neighbor| known.get(neighbor))
            .map(|source| UserCall {
                rsid: rsid.to_string(),
                genotype: source.genotype,
                nearest_snp: Some(source.rsid.clone()),
            })
            .ok_or_else(|| CustomError::ImputationUnavailable {
                rsid: rsid.to_string(),
                population: population.to_string(),
            })
    }
}
