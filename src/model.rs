use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::error::{CustomError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Population {
    #[value(name = "CEU")]
    Ceu,
    #[value(name = "YRI")]
    Yri,
    #[value(name = "JPT")]
    Jpt,
    #[value(name = "CHB")]
    Chb,
}

impl Population {
    pub fn as_str(self) -> &'static str {
        match self {
            Population::Ceu => "CEU",
            Population::Yri => "YRI",
            Population::Jpt => "JPT",
            Population::Chb => "CHB",
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(input.trim(), true).map_err(|_| CustomError::Population {
            input: input.trim().to_string(),
        })
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two allele characters as reported, e.g. `AG`.
///
/// Equality is literal; use [`Genotype::same_alleles`] for the
/// order-insensitive comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Genotype([char; 2]);

impl Genotype {
    pub fn new(first: char, second: char) -> Self {
        Self([first.to_ascii_uppercase(), second.to_ascii_uppercase()])
    }

    pub fn homozygous(allele: char) -> Self {
        Self::new(allele, allele)
    }

    pub fn alleles(&self) -> [char; 2] {
        self.0
    }

    pub fn same_alleles(&self, other: &Genotype) -> bool {
        let mut a = self.0;
        let mut b = other.0;
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }

    /// Alleles joined for display, e.g. `A/G`.
    pub fn slashed(&self) -> String {
        format!("{}/{}", self.0[0], self.0[1])
    }
}

impl FromStr for Genotype {
    type Err = CustomError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(a), Some(b), None) => Ok(Self::new(a, b)),
            _ => Err(CustomError::GenotypeLength {
                genotype: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0[0], self.0[1])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceVariant {
    pub rsid: String,
    pub chromosome: Option<String>,
    pub position: Option<u64>,
    /// Modern-human state.
    pub ancestral: char,
    /// Archaic state.
    pub out_of_africa: char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCall {
    pub rsid: String,
    pub genotype: Genotype,
    // Only set on imputed calls
    pub nearest_snp: Option<String>,
}

impl UserCall {
    pub fn new(rsid: impl Into<String>, genotype: Genotype) -> Self {
        Self {
            rsid: rsid.into(),
            genotype,
            nearest_snp: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub fn as_str(self) -> &'static str {
        match self {
            Strand::Forward => "forward",
            Strand::Reverse => "reverse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    HomozygousArchaic,
    HomozygousModern,
    Heterozygous,
    Unresolved,
}

impl Category {
    pub fn score(self) -> Score {
        match self {
            Category::HomozygousArchaic => Score::new(2, 2),
            Category::HomozygousModern => Score::new(0, 2),
            Category::Heterozygous => Score::new(1, 2),
            Category::Unresolved => Score::new(0, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::HomozygousArchaic => "homozygous_archaic",
            Category::HomozygousModern => "homozygous_modern",
            Category::Heterozygous => "heterozygous",
            Category::Unresolved => "unresolved",
        }
    }
}

/// Archaic alleles carried (numerator) out of alleles compared (denominator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub numerator: u32,
    pub denominator: u32,
}

impl Score {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub rsid: String,
    pub chromosome: Option<String>,
    pub position: Option<u64>,
    pub ancestral: char,
    pub out_of_africa: char,
    pub user_alleles: Genotype,
    pub strand: Strand,
    pub category: Category,
    pub score: Score,
    pub imputed_from: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub numerator: u64,
    pub denominator: u64,
}

impl Totals {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a ScoreEntry>) -> Self {
        entries.into_iter().fold(Self::default(), |acc, entry| Self {
            numerator: acc.numerator + entry.score.numerator as u64,
            denominator: acc.denominator + entry.score.denominator as u64,
        })
    }

    /// `None` when nothing was compared.
    pub fn percentage(&self) -> Option<f64> {
        if self.denominator == 0 {
            None
        } else {
            Some(100.0 * self.numerator as f64 / self.denominator as f64)
        }
    }
}
