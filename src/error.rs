use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("could not read {path}")]
    ReadWithPath {
        #[source]
        source: std::io::Error,
        path: std::path::PathBuf,
    },

    #[error("could not read population from standard input")]
    ReadPrompt {
        #[source]
        source: std::io::Error,
    },

    #[error("could not write to {path}")]
    Write {
        #[source]
        source: std::io::Error,
        path: std::path::PathBuf,
    },

    #[error("could not create output directory")]
    OutputDir {
        #[source]
        source: std::io::Error,
    },

    #[error("could not read CSV {path}")]
    CsvRead {
        #[source]
        source: csv::Error,
        path: std::path::PathBuf,
    },

    #[error("could not create CSV {path}")]
    CsvCreate {
        #[source]
        source: csv::Error,
        path: std::path::PathBuf,
    },

    #[error("could not write to CSV")]
    CsvWrite(#[from] csv::Error),

    #[error("could not write JSON summary")]
    JsonWrite(#[from] serde_json::Error),

    #[error("could not build thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("invalid progress bar template")]
    ProgressTemplate(#[from] indicatif::style::TemplateError),

    #[error("population identifier '{input}' is not valid (expected one of CEU, YRI, JPT, CHB)")]
    Population { input: String },

    #[error("expected 4 or 5 fields (got {n_fields}) in line {line_num} of genotype file")]
    GenotypeFields { line_num: usize, n_fields: usize },

    #[error("genotype '{genotype}' must have exactly two alleles")]
    GenotypeLength { genotype: String },

    #[error("invalid base '{base}' in genotype {genotype}")]
    InvalidBase { base: char, genotype: String },

    #[error("allele '{allele}' for {rsid} in reference panel is not a single base")]
    PanelAllele { rsid: String, allele: String },

    #[error("rsid {rsid} appears more than once in reference panel")]
    PanelDuplicate { rsid: String },

    #[error("rsid {rsid} not found in reference panel")]
    VariantNotFound { rsid: String },

    #[error("no neighbor available to impute {rsid} for population {population}")]
    ImputationUnavailable { rsid: String, population: String },

    #[error("could not score variant {rsid}")]
    Variant {
        #[source]
        source: Box<CustomError>,
        rsid: String,
    },
}

pub type Result<T> = std::result::Result<T, CustomError>;
