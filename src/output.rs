use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::process::Command;

use log::warn;
use serde::Serialize;

use crate::error::{CustomError, Result};
use crate::model::{Population, ScoreEntry};
use crate::score::ScoreRun;

#[derive(Serialize)]
struct ScoreRecord<'a> {
    rsid: &'a str,
    chromosome: Option<&'a str>,
    position: Option<u64>,
    ancestral: char,
    out_of_africa: char,
    user_alleles: String,
    strand: &'static str,
    category: &'static str,
    numerator: u32,
    denominator: u32,
    imputed_from: Option<&'a str>,
}

impl<'a> From<&'a ScoreEntry> for ScoreRecord<'a> {
    fn from(entry: &'a ScoreEntry) -> Self {
        Self {
            rsid: &entry.rsid,
            chromosome: entry.chromosome.as_deref(),
            position: entry.position,
            ancestral: entry.ancestral,
            out_of_africa: entry.out_of_africa,
            user_alleles: entry.user_alleles.to_string(),
            strand: entry.strand.as_str(),
            category: entry.category.as_str(),
            numerator: entry.score.numerator,
            denominator: entry.score.denominator,
            imputed_from: entry.imputed_from.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    genome: &'a str,
    population: &'a str,
    numerator: u64,
    denominator: u64,
    percentage: Option<f64>,
    n_scored: usize,
    n_imputed: usize,
    n_skipped: usize,
    n_unresolved: usize,
}

pub fn write_scores(run: &ScoreRun, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).map_err(|source| CustomError::CsvCreate {
        source,
        path: path.into(),
    })?;
    for entry in run.entries.values() {
        wtr.serialize(ScoreRecord::from(entry))?;
    }
    wtr.flush().map_err(|e| CustomError::Write {
        source: e,
        path: path.into(),
    })?;
    Ok(())
}

pub fn write_summary(
    run: &ScoreRun,
    population: Population,
    genome: &str,
    path: &Path,
) -> Result<()> {
    let summary = Summary {
        genome,
        population: population.as_str(),
        numerator: run.totals.numerator,
        denominator: run.totals.denominator,
        percentage: run.totals.percentage(),
        n_scored: run.entries.len(),
        n_imputed: run.n_imputed,
        n_skipped: run.n_skipped,
        n_unresolved: run.n_unresolved,
    };
    let json = serde_json::to_string_pretty(&summary)?;
    fs::write(path, json).map_err(|e| CustomError::Write {
        source: e,
        path: path.into(),
    })
}

const REPORT_COLUMNS: [&str; 5] = [
    "rsID",
    "Caveman Allele",
    "Ancestral Allele",
    "User Alleles",
    "Imputed From",
];

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn shared_alleles_line(run: &ScoreRun) -> String {
    let percentage = match run.totals.percentage() {
        Some(p) => format!("{p:.4}%"),
        None => "undefined".to_string(),
    };
    format!(
        "Alleles shared with a caveman: {} / {} ({})",
        run.totals.numerator, run.totals.denominator, percentage
    )
}

pub fn render_report(run: &ScoreRun, population: Population, genome: &str) -> String {
    let mut html = String::new();
    // Writing to a String cannot fail
    let _ = write!(
        html,
        "<html>\n  <head>\n    <title>Are You a Caveman?</title>\n  </head>\n  <body>\n  \
         <h3 style=\"text-align:left;\">Caveman Index:</h3>\n  \
         Genome file: {}<br>\n  Population given was: {}<br>\n  {}<br><br>\n",
        escape_html(genome),
        population,
        shared_alleles_line(run),
    );
    html.push_str("  <table border=\"1\">\n    <tr>\n");
    for header in REPORT_COLUMNS {
        let _ = writeln!(html, "      <th>{header}</th>");
    }
    html.push_str("    </tr>\n");
    for (rsid, entry) in &run.entries {
        let cells = [
            rsid.clone(),
            entry.out_of_africa.to_string(),
            entry.ancestral.to_string(),
            entry.user_alleles.slashed(),
            entry.imputed_from.clone().unwrap_or_default(),
        ];
        html.push_str("    <tr>\n");
        for cell in &cells {
            let _ = writeln!(html, "      <td>{}</td>", escape_html(cell));
        }
        html.push_str("    </tr>\n");
    }
    html.push_str("  </table>\n  </body>\n</html>\n");
    html
}

pub fn write_report(
    run: &ScoreRun,
    population: Population,
    genome: &str,
    path: &Path,
) -> Result<()> {
    fs::write(path, render_report(run, population, genome)).map_err(|e| CustomError::Write {
        source: e,
        path: path.into(),
    })
}

/// Hand the report to the desktop's default viewer. Failure only warns.
pub fn open_report(path: &Path) {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else {
        Command::new("xdg-open")
    };
    match command.arg(path).status() {
        Ok(status) if status.success() => {}
        Ok(status) => warn!("Opening {} exited with {status}", path.display()),
        Err(e) => warn!("Could not open {}: {e}", path.display()),
    }
}
