use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::{info, warn};
use rayon::ThreadPoolBuilder;

use crate::Args;
use crate::error::{CustomError, Result};
use crate::impute::NearestSnpImputer;
use crate::model::Population;
use crate::output::{open_report, shared_alleles_line, write_report, write_scores, write_summary};
use crate::reader::VariantRepository;
use crate::reader::genotype::read_genotype_file;
use crate::reader::neighbors::NeighborTable;
use crate::reader::panel::CsvPanel;
use crate::score::{ScoreRun, Scorer};

const PARALLEL_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone)]
pub struct RunSpec {
    pub genome: PathBuf,
    pub population: Population,
    pub panel: PathBuf,
    pub neighbors: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub threads: Option<usize>,
    pub open: bool,
}

impl RunSpec {
    pub fn print_paths(&self) {
        println!("GENOME    : {}", self.genome.display());
        println!("PANEL     : {}", self.panel.display());
        if let Some(neighbors) = &self.neighbors {
            println!("NEIGHBORS : {}", neighbors.display());
        }
        println!("POPULATION: {}", self.population);
        println!();
    }

    /// Report files are named after the genome file, without extension.
    pub fn genome_name(&self) -> String {
        self.genome
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "genome".to_string())
    }

    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_path()
    }
}

pub fn prompt_population(input: &mut impl BufRead, prompt: &mut impl Write) -> Result<Population> {
    let choices = [Population::Ceu, Population::Yri, Population::Jpt, Population::Chb]
        .iter()
        .map(|p| p.as_str())
        .join(", ");
    write!(prompt, "Select a population ({choices}): ")
        .and_then(|_| prompt.flush())
        .map_err(|source| CustomError::ReadPrompt { source })?;
    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|source| CustomError::ReadPrompt { source })?;
    Population::parse(&line)
}

pub fn build_run_spec(args: &Args) -> Result<RunSpec> {
    let genome = PathBuf::from(&args.genome);
    if !genome.exists() {
        return Err(CustomError::ReadWithPath {
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
            path: genome,
        });
    }
    let population = match args.population {
        Some(population) => population,
        None => prompt_population(&mut io::stdin().lock(), &mut io::stdout())?,
    };
    Ok(RunSpec {
        genome,
        population,
        panel: PathBuf::from(&args.reference_panel),
        neighbors: args.neighbors.as_ref().map(PathBuf::from),
        output_dir: PathBuf::from(&args.output_directory),
        threads: args.threads,
        open: args.open,
    })
}

/// A neighbor file that does not exist yields an empty table, so every
/// missing variant is skipped instead of imputed.
fn load_neighbors(path: Option<&Path>) -> Result<NeighborTable> {
    match path {
        Some(path) if path.exists() => NeighborTable::open(&path),
        Some(path) => {
            warn!(
                "Neighbor file {} not found; missing variants will not be imputed",
                path.display()
            );
            Ok(NeighborTable::default())
        }
        None => Ok(NeighborTable::default()),
    }
}

pub fn run(spec: &RunSpec) -> Result<()> {
    print!("Loading genotype file '{}'... ", spec.genome.display());
    // A failed flush only delays the progress message
    let _ = io::stdout().flush();
    let genome = read_genotype_file(&spec.genome)?;
    println!("done!");
    info!(
        "Loaded {} calls ({} no-calls, {} non-diploid or indel calls dropped)",
        genome.calls.len(),
        genome.n_no_calls,
        genome.n_dropped
    );

    let panel = CsvPanel::open(&spec.panel)?;
    info!("Loaded {} reference variants", panel.len());
    let neighbors = load_neighbors(spec.neighbors.as_deref())?;
    info!("Loaded {} imputation neighbors", neighbors.len());
    let imputer = NearestSnpImputer::new(neighbors);

    let rsids = panel.fetch_all_rsids()?;
    let scorer = Scorer::new(&panel, &imputer, spec.population);
    let threads = spec.threads;
    let score_run: ScoreRun =
        if (threads.is_none() && rsids.len() < PARALLEL_THRESHOLD) || threads == Some(1) {
            scorer.run(&rsids, &genome.calls)?
        } else if let Some(n) = threads {
            let pool = ThreadPoolBuilder::new().num_threads(n).build()?;
            pool.install(|| scorer.run_parallel(&rsids, &genome.calls))?
        } else {
            scorer.run_parallel(&rsids, &genome.calls)?
        };

    println!("{}", shared_alleles_line(&score_run));
    info!(
        "Scored {} variants ({} imputed, {} skipped, {} unresolved)",
        score_run.entries.len(),
        score_run.n_imputed,
        score_run.n_skipped,
        score_run.n_unresolved
    );

    let name = spec.genome_name();
    let scores_path = spec.output_dir().join(format!("{name}_scores.csv"));
    println!("Writing per-variant scores to {}...", scores_path.display());
    write_scores(&score_run, &scores_path)?;

    let summary_path = spec.output_dir().join(format!("{name}_summary.json"));
    println!("Writing score summary to {}...", summary_path.display());
    write_summary(&score_run, spec.population, &name, &summary_path)?;

    let report_path = spec.output_dir().join(format!("{name}.html"));
    println!("Writing report to {}...", report_path.display());
    write_report(&score_run, spec.population, &name, &report_path)?;

    if spec.open {
        open_report(&report_path);
    }
    Ok(())
}
