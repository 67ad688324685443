use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{CustomError, Result};
use crate::model::ReferenceVariant;
use crate::reader::VariantRepository;

#[derive(Debug, Deserialize)]
struct PanelRow {
    rsid: String,
    #[serde(default)]
    chromosome: Option<String>,
    #[serde(default)]
    position: Option<u64>,
    ancestral: String,
    out_of_africa: String,
}

fn single_base(rsid: &str, allele: &str) -> Result<char> {
    let mut chars = allele.chars();
    match (chars.next(), chars.next()) {
        (Some(base), None) => Ok(base.to_ascii_uppercase()),
        _ => Err(CustomError::PanelAllele {
            rsid: rsid.to_string(),
            allele: allele.to_string(),
        }),
    }
}

/// Reference panel held in memory, loaded from a CSV with columns
/// `rsid,chromosome,position,ancestral,out_of_africa`.
pub struct CsvPanel {
    rsids: Vec<String>,
    variants: HashMap<String, ReferenceVariant>,
}

impl CsvPanel {
    pub fn open(path: &impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|source| CustomError::CsvRead {
                source,
                path: path.to_path_buf(),
            })?;

        let mut rows = Vec::new();
        for result in reader.deserialize() {
            let row: PanelRow = result.map_err(|source| CustomError::CsvRead {
                source,
                path: path.to_path_buf(),
            })?;
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    fn from_rows(rows: Vec<PanelRow>) -> Result<Self> {
        let mut rsids = Vec::with_capacity(rows.len());
        let mut variants = HashMap::with_capacity(rows.len());
        for row in rows {
            let variant = ReferenceVariant {
                ancestral: single_base(&row.rsid, &row.ancestral)?,
                out_of_africa: single_base(&row.rsid, &row.out_of_africa)?,
                chromosome: row.chromosome.filter(|c| !c.is_empty()),
                position: row.position,
                rsid: row.rsid,
            };
            if variants.contains_key(&variant.rsid) {
                return Err(CustomError::PanelDuplicate { rsid: variant.rsid });
            }
            rsids.push(variant.rsid.clone());
            variants.insert(variant.rsid.clone(), variant);
        }
        Ok(Self { rsids, variants })
    }

    pub fn len(&self) -> usize {
        self.rsids.len()
    }
}

impl VariantRepository for CsvPanel {
    fn fetch_all_rsids(&self) -> Result<Vec<String>> {
        Ok(self.rsids.clone())
    }

    fn fetch_variant(&self, rsid: &str) -> Result<ReferenceVariant> {
        self.variants
            .get(rsid)
            .cloned()
            .ok_or_else(|| CustomError::VariantNotFound {
                rsid: rsid.to_string(),
            })
    }
}
