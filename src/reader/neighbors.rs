use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{CustomError, Result};
use crate::model::Population;

#[derive(Debug, Deserialize)]
struct NeighborRow {
    population: String,
    rsid: String,
    neighbor: String,
    #[serde(default)]
    distance: Option<f64>,
}

/// Candidate proxy variants per population and target rsid, nearest first.
#[derive(Debug, Default)]
pub struct NeighborTable {
    candidates: HashMap<(Population, String), Vec<(String, Option<f64>)>>,
}

impl NeighborTable {
    /// Load from a CSV with columns `population,rsid,neighbor,distance`.
    /// `distance` may be left empty; such candidates rank after every
    /// candidate with a distance.
    pub fn open(path: &impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|source| CustomError::CsvRead {
                source,
                path: path.to_path_buf(),
            })?;

        let mut table = Self::default();
        for result in reader.deserialize() {
            let row: NeighborRow = result.map_err(|source| CustomError::CsvRead {
                source,
                path: path.to_path_buf(),
            })?;
            let population = Population::parse(&row.population)?;
            table.insert(population, &row.rsid, &row.neighbor, row.distance);
        }
        table.rank();
        Ok(table)
    }

    pub fn insert(
        &mut self,
        population: Population,
        rsid: &str,
        neighbor: &str,
        distance: Option<f64>,
    ) {
        self.candidates
            .entry((population, rsid.to_string()))
            .or_default()
            .push((neighbor.to_string(), distance));
    }

    // Stable, so equal distances keep file order
    fn rank(&mut self) {
        for list in self.candidates.values_mut() {
            list.sort_by(|(_, a), (_, b)| match (a, b) {
                (Some(a), Some(b)) => a.total_cmp(b),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            });
        }
    }

    pub fn candidates(&self, population: Population, rsid: &str) -> impl Iterator<Item = &str> {
        self.candidates
            .get(&(population, rsid.to_string()))
            .into_iter()
            .flatten()
            .map(|(neighbor, _)| neighbor.as_str())
    }

    pub fn len(&self) -> usize {
        self.candidates.values().map(Vec::len).sum()
    }
}
