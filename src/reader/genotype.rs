use std::collections::HashMap;
use std::path::Path;

use log::debug;

use crate::error::{CustomError, Result};
use crate::model::{Genotype, UserCall};

const FIELDS_COMBINED: usize = 4;
const FIELDS_SPLIT: usize = 5;

pub type GenotypeCalls = HashMap<String, UserCall>;

#[derive(Debug)]
pub struct GenotypeFile {
    pub calls: GenotypeCalls,
    pub n_no_calls: usize,
    pub n_dropped: usize,
}

fn is_nucleotide(allele: char) -> bool {
    matches!(allele, 'A' | 'C' | 'G' | 'T')
}

fn is_no_call(alleles: &str) -> bool {
    alleles.is_empty() || alleles.chars().all(|c| c == '-' || c == '0')
}

/// Read a raw genotype export into calls keyed by rsid.
///
/// Accepts tab-separated `rsid chromosome position genotype` rows, or
/// `rsid chromosome position allele1 allele2` rows. Comment lines start
/// with `#` and a leading `rsid` header row is skipped. No-calls, calls
/// that are not diploid and indel calls (`DD`, `DI`, `II`) are left out, so
/// the variant is treated as missing.
pub fn read_genotype_file(path: &impl AsRef<Path>) -> Result<GenotypeFile> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CustomError::CsvRead {
            source,
            path: path.to_path_buf(),
        })?;

    let mut calls = HashMap::new();
    let mut n_no_calls = 0;
    let mut n_dropped = 0;

    for (record_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|source| CustomError::CsvRead {
            source,
            path: path.to_path_buf(),
        })?;
        let line_num = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(record_idx + 1);

        if record_idx == 0 && record.get(0).is_some_and(|f| f.eq_ignore_ascii_case("rsid")) {
            continue;
        }

        let rsid = &record[0];
        let alleles = match record.len() {
            FIELDS_COMBINED => record[3].to_string(),
            FIELDS_SPLIT => format!("{}{}", &record[3], &record[4]),
            n_fields => return Err(CustomError::GenotypeFields { line_num, n_fields }),
        };

        if is_no_call(&alleles) {
            n_no_calls += 1;
            continue;
        }
        match alleles.parse::<Genotype>() {
            Ok(genotype) if genotype.alleles().iter().all(|&a| is_nucleotide(a)) => {
                calls.insert(rsid.to_string(), UserCall::new(rsid, genotype));
            }
            Ok(_) => {
                debug!("Dropping {rsid} on line {line_num}: genotype '{alleles}' is not A/C/G/T");
                n_dropped += 1;
            }
            Err(_) => {
                debug!("Dropping {rsid} on line {line_num}: genotype '{alleles}' is not diploid");
                n_dropped += 1;
            }
        }
    }

    Ok(GenotypeFile {
        calls,
        n_no_calls,
        n_dropped,
    })
}
