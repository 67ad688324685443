mod allele;
mod classify;
mod cli;
mod error;
mod impute;
mod model;
mod output;
mod reader;
mod score;

use crate::error::Result;
use crate::model::Population;
use chrono::Local;
use clap::Parser;
use miette::IntoDiagnostic;

/// Score how many alleles a personal genome shares with Neandertals.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Raw genotype file (23andMe or AncestryDNA style).
    #[arg(value_hint = clap::ValueHint::FilePath)]
    genome: String,

    /// Population used to pick imputation neighbors. Prompted for if omitted.
    #[arg(short, long, value_enum, ignore_case = true)]
    population: Option<Population>,

    /// Reference panel CSV (rsid,chromosome,position,ancestral,out_of_africa).
    #[arg(
        short,
        long,
        value_hint = clap::ValueHint::FilePath,
        default_value = "data/neandertal-SNPs.csv"
    )]
    reference_panel: String,

    /// Imputation neighbor CSV (population,rsid,neighbor,distance).
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    neighbors: Option<String>,

    /// Output directory.
    #[arg(
        short,
        long,
        value_hint = clap::ValueHint::DirPath,
        default_value_t = format!("caveman_output_{}", Local::now().format("%Y%m%d_%H%M%S"))
    )]
    output_directory: String,

    /// Number of threads. Chosen automatically from the panel size if omitted.
    #[arg(short, long)]
    threads: Option<usize>,

    /// Open the HTML report once it is written.
    #[arg(long)]
    open: bool,
}

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let run_spec = cli::build_run_spec(&args)?;
    std::fs::create_dir_all(run_spec.output_dir())
        .map_err(|e| error::CustomError::OutputDir { source: e })?;
    run_spec.print_paths();

    cli::run(&run_spec)?;
    Ok(())
}

fn main() -> miette::Result<()> {
    try_main().into_diagnostic()
}
