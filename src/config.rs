// src/config.rs
use crate::model::markov::ErrorClass;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How reads are addressed on the reference genome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressingMode {
    /// Single sequence; windows wrap around its end
    Circular,
    /// Sequences laid end to end; windows never span two sequences
    Linear,
}

/// Flowcell chemistry, which selects the profile file prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Chemistry {
    R7,
    #[serde(rename = "R7.3")]
    R73,
}

impl Chemistry {
    pub fn prefix(&self) -> &'static str {
        match self {
            Chemistry::R7 => "R7",
            Chemistry::R73 => "R7.3",
        }
    }
}

impl fmt::Display for Chemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for Chemistry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "R7" => Ok(Chemistry::R7),
            "R7.3" => Ok(Chemistry::R73),
            other => Err(format!("unsupported chemistry '{}' (expected R7 or R7.3)", other)),
        }
    }
}

/// Where the per-chemistry profile files live
#[derive(Debug, Clone)]
pub struct ProfileSource {
    pub dir: PathBuf,
    pub chemistry: Chemistry,
    /// Replaces `<chem>_model_profile` when set
    pub model_profile: Option<PathBuf>,
}

impl ProfileSource {
    pub fn new(dir: impl Into<PathBuf>, chemistry: Chemistry) -> Self {
        Self {
            dir: dir.into(),
            chemistry,
            model_profile: None,
        }
    }

    /// Path of `<dir>/<chem>_<suffix>`
    pub fn path(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}_{}", self.chemistry.prefix(), suffix))
    }

    pub fn model_profile_path(&self) -> PathBuf {
        self.model_profile
            .clone()
            .unwrap_or_else(|| self.path("model_profile"))
    }
}

/// Per-class scaling of sampled error lengths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassWeights {
    pub mismatch: f64,
    pub insertion: f64,
    pub deletion: f64,
}

impl ClassWeights {
    pub fn get(&self, class: ErrorClass) -> f64 {
        match class {
            ErrorClass::Mismatch => self.mismatch,
            ErrorClass::Insertion => self.insertion,
            ErrorClass::Deletion => self.deletion,
        }
    }
}

impl Default for ClassWeights {
    fn default() -> Self {
        Self {
            mismatch: 1.0,
            insertion: 1.0,
            deletion: 1.0,
        }
    }
}

/// Tunables for one simulation run
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub mode: AddressingMode,
    pub weights: ClassWeights,
    /// Emit error-free reads from the whole-read length profile
    pub perfect: bool,
    /// Reject and compress homopolymer runs of 6 or more
    pub homopolymer_bias: bool,
    /// Aligned-region lengths below this are redrawn
    pub min_aligned_length: usize,
    /// Total read lengths below this are redrawn
    pub min_total_length: usize,
    /// Bound for every redraw loop
    pub max_attempts: usize,
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            mode: AddressingMode::Linear,
            weights: ClassWeights::default(),
            perfect: false,
            homopolymer_bias: false,
            min_aligned_length: 80,
            min_total_length: 400,
            max_attempts: 10_000,
            seed: None,
        }
    }
}
