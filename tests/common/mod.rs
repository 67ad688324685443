use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

// (rsid, chromosome, position, ancestral, out_of_africa)
const PANEL: &[(&str, &str, u64, char, char)] = &[
    ("rs1", "1", 1_000, 'A', 'G'),
    ("rs2", "1", 2_000, 'C', 'T'),
    ("rs3", "2", 3_000, 'A', 'G'),
    ("rs4", "2", 4_000, 'A', 'G'),
    ("rs5", "3", 5_000, 'A', 'G'),
    ("rs6", "3", 6_000, 'A', 'G'),
];

// rs4 is absent and imputed from rs100 for CEU; rs5 has a no-call and no neighbor.
const GENOME: &[(&str, &str, u64, &str)] = &[
    ("rs1", "1", 1_000, "GG"),
    ("rs2", "1", 2_000, "GA"),
    ("rs3", "2", 3_000, "AC"),
    ("rs5", "3", 5_000, "--"),
    ("rs6", "3", 6_000, "AA"),
    ("rs100", "2", 4_100, "AG"),
    ("rs200", "X", 9_000, "A"),
];

// (population, rsid, neighbor, distance)
const NEIGHBORS: &[(&str, &str, &str, &str)] = &[
    ("CEU", "rs4", "rs999", "10"),
    ("CEU", "rs4", "rs100", "100"),
    ("YRI", "rs4", "rs999", "10"),
];

pub struct Dataset {
    pub genome: PathBuf,
    pub panel: PathBuf,
    pub neighbors: PathBuf,
    pub output_dir: PathBuf,
}

impl Dataset {
    pub fn output_file(&self, suffix: &str) -> PathBuf {
        self.output_dir.join(format!("genome_test{suffix}"))
    }
}

pub fn create_dataset(label: &str) -> io::Result<Dataset> {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let base_dir = std::env::temp_dir().join("caveman-tests").join(format!(
        "{}-{}-{}",
        std::process::id(),
        id,
        label
    ));
    fs::create_dir_all(&base_dir)?;

    let dataset = Dataset {
        genome: base_dir.join("genome_test.txt"),
        panel: base_dir.join("panel.csv"),
        neighbors: base_dir.join("neighbors.csv"),
        output_dir: base_dir.join("output"),
    };
    write_genome(&dataset.genome)?;
    write_panel(&dataset.panel)?;
    write_neighbors(&dataset.neighbors)?;
    Ok(dataset)
}

fn write_genome(path: &Path) -> io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "# This data file generated for testing")?;
    writeln!(file, "# rsid\tchromosome\tposition\tgenotype")?;
    for (rsid, chromosome, position, genotype) in GENOME {
        writeln!(file, "{rsid}\t{chromosome}\t{position}\t{genotype}")?;
    }
    Ok(())
}

fn write_panel(path: &Path) -> io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "rsid,chromosome,position,ancestral,out_of_africa")?;
    for (rsid, chromosome, position, ancestral, out_of_africa) in PANEL {
        writeln!(file, "{rsid},{chromosome},{position},{ancestral},{out_of_africa}")?;
    }
    Ok(())
}

fn write_neighbors(path: &Path) -> io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "population,rsid,neighbor,distance")?;
    for (population, rsid, neighbor, distance) in NEIGHBORS {
        writeln!(file, "{population},{rsid},{neighbor},{distance}")?;
    }
    Ok(())
}
