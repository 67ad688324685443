use std::collections::BTreeMap;

use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rayon::prelude::*;

use crate::classify::classify;
use crate::error::{CustomError, Result};
use crate::impute::Imputer;
use crate::model::{Category, Population, ScoreEntry, Totals};
use crate::reader::VariantRepository;
use crate::reader::genotype::GenotypeCalls;

/// Outcome of scoring one panel variant.
enum Slot {
    Scored(ScoreEntry),
    Skipped,
}

pub struct ScoreRun {
    pub entries: BTreeMap<String, ScoreEntry>,
    pub totals: Totals,
    pub n_imputed: usize,
    pub n_skipped: usize,
    pub n_unresolved: usize,
}

impl ScoreRun {
    fn from_slots(slots: impl IntoIterator<Item = Slot>) -> Self {
        let mut entries = BTreeMap::new();
        let mut n_skipped = 0;
        for slot in slots {
            match slot {
                // A repeated panel rsid replaces the earlier entry
                Slot::Scored(entry) => {
                    entries.insert(entry.rsid.clone(), entry);
                }
                Slot::Skipped => n_skipped += 1,
            }
        }
        let totals = Totals::from_entries(entries.values());
        let n_imputed = entries.values().filter(|e| e.imputed_from.is_some()).count();
        let n_unresolved = entries
            .values()
            .filter(|e| e.category == Category::Unresolved)
            .count();
        Self {
            entries,
            totals,
            n_imputed,
            n_skipped,
            n_unresolved,
        }
    }
}

pub struct Scorer<'a> {
    repository: &'a dyn VariantRepository,
    imputer: &'a dyn Imputer,
    population: Population,
}

impl<'a> Scorer<'a> {
    pub fn new(
        repository: &'a dyn VariantRepository,
        imputer: &'a dyn Imputer,
        population: Population,
    ) -> Self {
        Self {
            repository,
            imputer,
            population,
        }
    }

    fn progress_bar(n_variants: usize) -> Result<ProgressBar> {
        let pb = ProgressBar::new(n_variants as u64);
        pb.set_style(ProgressStyle::with_template(
            "[{elapsed_precise}] {bar:30} {pos}/{len} variants",
        )?);
        Ok(pb)
    }

    fn score_variant(&self, rsid: &str, known: &GenotypeCalls) -> Result<Slot> {
        let call = match known.get(rsid) {
            Some(call) => call.clone(),
            None => match self.imputer.impute(known, rsid, self.population) {
                Ok(call) => {
                    if let Some(source) = &call.nearest_snp {
                        info!("Imputed {source} -> {rsid}");
                    }
                    call
                }
                Err(CustomError::ImputationUnavailable { .. }) => {
                    warn!(
                        "No {} neighbor genotyped for {rsid}, skipping",
                        self.population
                    );
                    return Ok(Slot::Skipped);
                }
                Err(e) => return Err(e),
            },
        };

        let variant = self.repository.fetch_variant(rsid)?;
        let mut entry = classify(&variant, &call).map_err(|e| CustomError::Variant {
            source: Box::new(e),
            rsid: rsid.to_string(),
        })?;
        if entry.category == Category::Unresolved {
            warn!(
                "Could not match user alleles {} to {rsid} ({}/{}) on either strand",
                call.genotype, variant.ancestral, variant.out_of_africa
            );
        }
        entry.imputed_from = call.nearest_snp;
        Ok(Slot::Scored(entry))
    }

    pub fn run(&self, panel: &[String], known: &GenotypeCalls) -> Result<ScoreRun> {
        let pb = Self::progress_bar(panel.len())?;
        let mut slots = Vec::with_capacity(panel.len());
        for rsid in panel {
            slots.push(self.score_variant(rsid, known)?);
            pb.inc(1);
        }
        pb.abandon();
        Ok(ScoreRun::from_slots(slots))
    }

    /// Same result as [`Scorer::run`]; variants are scored independently
    /// and merged in panel order.
    pub fn run_parallel(&self, panel: &[String], known: &GenotypeCalls) -> Result<ScoreRun> {
        let pb = Self::progress_bar(panel.len())?;
        let slots = panel
            .par_iter()
            .map(|rsid| {
                let slot = self.score_variant(rsid, known);
                pb.inc(1);
                slot
            })
            .collect::<Result<Vec<Slot>>>()?;
        pb.abandon();
        Ok(ScoreRun::from_slots(slots))
    }
}
