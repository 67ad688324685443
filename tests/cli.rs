mod common;

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

#[test]
fn cli_scores_panel_and_writes_outputs() {
    let dataset = common::create_dataset("ceu").unwrap();
    let output = run_caveman(&dataset, &["--population", "CEU"], None);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Alleles shared with a caveman: 4 / 8 (50.0000%)"),
        "unexpected stdout: {stdout}"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Imputed rs100 -> rs4"),
        "imputation was not logged: {stderr}"
    );

    let records = read_scores(&dataset);
    assert_eq!(
        records.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["rs1", "rs2", "rs3", "rs4", "rs6"]
    );
    assert_record(&records["rs1"], "GG", "homozygous_archaic", (2, 2), "");
    assert_record(&records["rs2"], "CT", "heterozygous", (1, 2), "");
    assert_eq!(records["rs2"]["strand"], "reverse");
    assert_record(&records["rs3"], "TG", "unresolved", (0, 0), "");
    assert_record(&records["rs4"], "AG", "heterozygous", (1, 2), "rs100");
    assert_record(&records["rs6"], "AA", "homozygous_modern", (0, 2), "");

    let summary = read_summary(&dataset);
    assert_eq!(summary["population"], "CEU");
    assert_eq!(summary["genome"], "genome_test");
    assert_eq!(summary["numerator"], 4);
    assert_eq!(summary["denominator"], 8);
    assert_eq!(summary["percentage"], 50.0);
    assert_eq!(summary["n_scored"], 5);
    assert_eq!(summary["n_imputed"], 1);
    assert_eq!(summary["n_skipped"], 1);
    assert_eq!(summary["n_unresolved"], 1);

    let html = fs::read_to_string(dataset.output_file(".html")).expect("missing report");
    assert!(html.contains("Population given was: CEU"));
    assert!(html.contains("<td>rs100</td>"));
}

#[test]
fn neighbors_depend_on_population() {
    let dataset = common::create_dataset("yri").unwrap();
    let output = run_caveman(&dataset, &["--population", "yri"], None);
    assert_success(&output);

    let records = read_scores(&dataset);
    assert!(!records.contains_key("rs4"));
    let summary = read_summary(&dataset);
    assert_eq!(summary["population"], "YRI");
    assert_eq!(summary["numerator"], 3);
    assert_eq!(summary["denominator"], 6);
    assert_eq!(summary["n_skipped"], 2);
    assert_eq!(summary["n_imputed"], 0);
}

#[test]
fn indel_calls_are_treated_as_missing() {
    let dataset = common::create_dataset("indel").unwrap();
    let mut genome = fs::OpenOptions::new()
        .append(true)
        .open(&dataset.genome)
        .unwrap();
    writeln!(genome, "rs5\t3\t5000\tDI").unwrap();
    drop(genome);

    let output = run_caveman(&dataset, &["--population", "CEU"], None);
    assert_success(&output);

    let records = read_scores(&dataset);
    assert!(!records.contains_key("rs5"));
    let summary = read_summary(&dataset);
    assert_eq!(summary["numerator"], 4);
    assert_eq!(summary["denominator"], 8);
    assert_eq!(summary["n_skipped"], 1);
}

#[test]
fn missing_neighbor_file_skips_imputation() {
    let mut dataset = common::create_dataset("no-neighbors").unwrap();
    dataset.neighbors = dataset.neighbors.with_file_name("no_such_neighbors.csv");
    let output = run_caveman(&dataset, &["--population", "CEU"], None);
    assert_success(&output);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("no_such_neighbors.csv"),
        "missing neighbor file was not reported: {stderr}"
    );
    let records = read_scores(&dataset);
    assert!(!records.contains_key("rs4"));
    let summary = read_summary(&dataset);
    assert_eq!(summary["numerator"], 3);
    assert_eq!(summary["denominator"], 6);
    assert_eq!(summary["n_imputed"], 0);
    assert_eq!(summary["n_skipped"], 2);
}

#[test]
fn parallel_run_matches_sequential() {
    let sequential = common::create_dataset("threads-1").unwrap();
    assert_success(&run_caveman(
        &sequential,
        &["--population", "CEU", "--threads", "1"],
        None,
    ));
    let parallel = common::create_dataset("threads-4").unwrap();
    assert_success(&run_caveman(
        &parallel,
        &["--population", "CEU", "--threads", "4"],
        None,
    ));

    assert_eq!(read_scores(&sequential), read_scores(&parallel));
    assert_eq!(read_summary(&sequential), read_summary(&parallel));
}

#[test]
fn population_is_prompted_when_omitted() {
    let dataset = common::create_dataset("prompt").unwrap();
    let output = run_caveman(&dataset, &[], Some("chb\n"));
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Select a population (CEU, YRI, JPT, CHB): "));
    assert_eq!(read_summary(&dataset)["population"], "CHB");
}

#[test]
fn invalid_prompted_population_fails() {
    let dataset = common::create_dataset("prompt-err").unwrap();
    let output = run_caveman(&dataset, &[], Some("Martian\n"));
    assert!(
        !output.status.success(),
        "caveman unexpectedly succeeded: stdout={}",
        String::from_utf8_lossy(&output.stdout)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Martian"),
        "stderr did not name the population: {stderr}"
    );
}

#[test]
fn missing_genome_file_fails() {
    let mut dataset = common::create_dataset("missing").unwrap();
    dataset.genome = dataset.genome.with_file_name("does_not_exist.txt");
    let output = run_caveman(&dataset, &["--population", "CEU"], None);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("does_not_exist.txt"),
        "stderr did not name the missing file: {stderr}"
    );
}

fn run_caveman(dataset: &common::Dataset, extra: &[&str], stdin: Option<&str>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_caveman"));
    command
        .arg(dataset.genome.as_os_str())
        .arg("--reference-panel")
        .arg(dataset.panel.as_os_str())
        .arg("--neighbors")
        .arg(dataset.neighbors.as_os_str())
        .arg("--output-directory")
        .arg(dataset.output_dir.as_os_str())
        .args(extra)
        .env("RUST_LOG", "info")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().expect("failed to run caveman");
    {
        let mut pipe = child.stdin.take().expect("stdin not piped");
        if let Some(input) = stdin {
            // The process may exit before reading when the population is given
            let _ = pipe.write_all(input.as_bytes());
        }
    }
    child.wait_with_output().expect("failed to wait for caveman")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "caveman failed: stdout={} stderr={}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn read_scores(dataset: &common::Dataset) -> BTreeMap<String, HashMap<String, String>> {
    let path = dataset.output_file("_scores.csv");
    let mut reader = csv::Reader::from_path(&path).expect("missing scores CSV");
    let mut records = BTreeMap::new();
    for row in reader.deserialize() {
        let row: HashMap<String, String> = row.expect("invalid scores CSV row");
        records.insert(row["rsid"].clone(), row);
    }
    records
}

fn read_summary(dataset: &common::Dataset) -> Value {
    let path = dataset.output_file("_summary.json");
    let json = fs::read_to_string(&path).expect("missing summary JSON");
    serde_json::from_str(&json).expect("invalid summary JSON")
}

fn assert_record(
    record: &HashMap<String, String>,
    user_alleles: &str,
    category: &str,
    score: (u32, u32),
    imputed_from: &str,
) {
    let rsid = &record["rsid"];
    assert_eq!(record["user_alleles"], user_alleles, "user alleles for {rsid}");
    assert_eq!(record["category"], category, "category for {rsid}");
    assert_eq!(record["numerator"], score.0.to_string(), "numerator for {rsid}");
    assert_eq!(record["denominator"], score.1.to_string(), "denominator for {rsid}");
    assert_eq!(record["imputed_from"], imputed_from, "imputed_from for {rsid}");
}
