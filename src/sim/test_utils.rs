// src/sim/test_utils.rs
use crate::model::ecdf::{build_ecdf, BucketKey, EcdfRow, EcdfTable};
use crate::model::markov::{ChainState, TransitionRow, TransitionTable};
use crate::model::mixture::{LengthMixtures, MixtureParams};
use crate::model::profile::ErrorModel;
use crate::sim::extract::ReferenceTable;

pub fn mixtures() -> LengthMixtures {
    LengthMixtures::new(MixtureParams {
        mismatch: [1.0, 0.0, 0.5, 0.8],
        insertion: [1.5, 1.0, 0.6, 0.7],
        deletion: [1.5, 1.0, 0.6, 0.7],
    })
    .unwrap()
}

pub fn table(keys: &[BucketKey], rows: &[(f64, f64, f64)]) -> EcdfTable {
    let rows: Vec<EcdfRow> = rows
        .iter()
        .map(|&(lo, hi, p)| EcdfRow { lo, hi, probs: vec![p; keys.len()] })
        .collect();
    build_ecdf(keys, &rows).unwrap()
}

pub fn test_model() -> ErrorModel {
    let rows = ChainState::all()
        .into_iter()
        .map(|s| (s, TransitionRow::new(0.5, 0.25, 0.25).unwrap()))
        .collect();
    let single = [BucketKey::new(0, 1)];
    let by_match = [BucketKey::new(0, 5), BucketKey::new(5, 1000)];
    ErrorModel {
        mixtures: mixtures(),
        transitions: TransitionTable::new(rows).unwrap(),
        first_match: table(&single, &[(0.0, 5.0, 0.5), (5.0, 20.0, 1.0)]),
        match_length: table(&by_match, &[(0.0, 1.0, 0.3), (1.0, 10.0, 0.8), (10.0, 30.0, 1.0)]),
        align_ratio: table(&single, &[(0.78, 0.8, 0.5), (0.8, 1.0, 1.0)]),
        ht_ratio: table(&single, &[(0.0, 0.5, 0.5), (0.5, 1.0, 1.0)]),
    }
}

/// Deterministic, homopolymer-free sequence of `len` bases
pub fn acgt_sequence(len: usize) -> Vec<u8> {
    b"ACGT".iter().cycle().take(len).copied().collect()
}

pub fn single_reference(len: usize) -> ReferenceTable {
    ReferenceTable::from_records(vec![("chr1".to_string(), acgt_sequence(len))])
}
