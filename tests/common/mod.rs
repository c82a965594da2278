#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use longsim::model::ecdf::{build_ecdf, BucketKey, EcdfRow, EcdfTable};
use longsim::model::markov::{ChainState, TransitionRow, TransitionTable};
use longsim::model::mixture::{LengthMixtures, MixtureParams};
use longsim::model::profile::ErrorModel;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const MODEL_PROFILE: &str = "type\tp1\tp2\tp3\tp4\n\
mismatch\t1.0\t0\t0.5\t0.8\n\
insertion\t1.5\t1.0\t0.6\t0.7\n\
deletion\t1.5\t1.0\t0.6\t0.7\n";

pub const MARKOV_MODEL: &str = "succedent\tmis\tins\tdel\n\
start\t0.5\t0.25\t0.25\n\
mis\t0.6\t0.2\t0.2\n\
ins\t0.4\t0.4\t0.2\n\
del\t0.4\t0.2\t0.4\n\
mis0\t0.5\t0.25\t0.25\n\
ins0\t0.3\t0.5\t0.2\n\
del0\t0.3\t0.2\t0.5\n";

/// Write a complete R7 profile set into `dir`.
pub fn write_profiles(dir: &Path) {
    let files = [
        ("R7_model_profile", MODEL_PROFILE.to_string()),
        ("R7_error_markov_model", MARKOV_MODEL.to_string()),
        ("R7_first_match.hist", "length\t0-1\n0-5\t0.5\n5-20\t1\n".to_string()),
        (
            "R7_match_markov_model",
            "length\t0-5\t5-1000\n0-1\t0.3\t0.2\n1-10\t0.8\t0.6\n10-30\t1\t1\n".to_string(),
        ),
        (
            "R7_unaligned_length_ecdf",
            "Aligned / Unaligned ratio:\t3\nlength\t0-1\n190-200\t0.5\n200-210\t1\n".to_string(),
        ),
        (
            "R7_align_ratio",
            "ratio\t0-1000\t1000-100000\n0.78-0.8\t0.5\t0.4\n0.8-1.0\t1\t1\n".to_string(),
        ),
        ("R7_ht_ratio", "ratio\t0-100000\n0.0-0.5\t0.5\n0.5-1.0\t1\n".to_string()),
        ("R7_aligned_length_ecdf", "length\t0-1\n990-1000\t0.5\n1000-1010\t1\n".to_string()),
        ("R7_aligned_reads_ecdf", "length\t0-1\n1190-1200\t0.5\n1200-1210\t1\n".to_string()),
    ];
    for (name, text) in files {
        fs::write(dir.join(name), text).unwrap();
    }
}

/// Random single-sequence reference, written as FASTA.
pub fn write_reference(path: &Path, names: &[&str], len: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut text = String::new();
    for name in names {
        text.push_str(&format!(">{}\n", name));
        let seq: String = (0..len).map(|_| b"ACGT"[rng.gen_range(0..4)] as char).collect();
        text.push_str(&seq);
        text.push('\n');
    }
    fs::write(path, text).unwrap();
}

fn single_table(rows: &[(f64, f64, f64)]) -> EcdfTable {
    let rows: Vec<EcdfRow> = rows
        .iter()
        .map(|&(lo, hi, p)| EcdfRow { lo, hi, probs: vec![p] })
        .collect();
    build_ecdf(&[BucketKey::new(0, 1)], &rows).unwrap()
}

/// Model whose first match run is always exactly `first_match` bases.
pub fn model_with_first_match(first_match: f64) -> ErrorModel {
    let rows: HashMap<ChainState, TransitionRow> = ChainState::all()
        .into_iter()
        .map(|s| (s, TransitionRow::new(0.5, 0.25, 0.25).unwrap()))
        .collect();
    ErrorModel {
        mixtures: LengthMixtures::new(MixtureParams {
            mismatch: [1.0, 0.0, 0.5, 0.8],
            insertion: [1.5, 1.0, 0.6, 0.7],
            deletion: [1.5, 1.0, 0.6, 0.7],
        })
        .unwrap(),
        transitions: TransitionTable::new(rows).unwrap(),
        first_match: single_table(&[(first_match, first_match, 1.0)]),
        match_length: single_table(&[(0.0, 1.0, 0.3), (1.0, 10.0, 0.8), (10.0, 30.0, 1.0)]),
        align_ratio: single_table(&[(1.0, 1.0, 1.0)]),
        ht_ratio: single_table(&[(0.0, 0.5, 0.5), (0.5, 1.0, 1.0)]),
    }
}
