// src/model/profile.rs
use crate::config::{ProfileSource, SimConfig};
use crate::error::{Result, SimError};
use crate::io::profile::{
    open_profile, parse_ecdf, parse_markov_model, parse_model_profile, parse_unaligned_profile,
};
use crate::model::ecdf::{build_ecdf, EcdfTable};
use crate::model::markov::TransitionTable;
use crate::model::mixture::LengthMixtures;
use rand::Rng;
use std::path::Path;
use tracing::info;

/// Per-chemistry tables consulted while simulating each read
#[derive(Debug, Clone)]
pub struct ErrorModel {
    pub mixtures: LengthMixtures,
    pub transitions: TransitionTable,
    /// Length of the first match run of a read
    pub first_match: EcdfTable,
    /// Match-run length, bucketed by the previous match-run length
    pub match_length: EcdfTable,
    /// Aligned length / total length, bucketed by aligned length
    pub align_ratio: EcdfTable,
    /// Head share of the unaligned remainder, bucketed by remainder length
    pub ht_ratio: EcdfTable,
}

/// Lengths drawn up front for every read of the run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadPlan {
    pub unaligned_lengths: Vec<usize>,
    /// Target reference-space length of each aligned read
    pub ref_lengths: Vec<usize>,
}

impl ReadPlan {
    pub fn total(&self) -> usize {
        self.unaligned_lengths.len() + self.ref_lengths.len()
    }
}

#[derive(Debug, Clone)]
pub struct ProfileBundle {
    pub model: ErrorModel,
    pub plan: ReadPlan,
}

/// Split `total` reads into (aligned, unaligned) using the aligned:unaligned rate.
pub fn partition_reads(total: usize, rate: f64, perfect: bool) -> (usize, usize) {
    let aligned = if perfect {
        total
    } else {
        ((total as f64) * rate / (rate + 1.0)).round() as usize
    };
    let aligned = aligned.min(total);
    (aligned, total - aligned)
}

/// Draw `count` lengths from the sole bucket of `table`.
pub fn draw_unaligned_lengths<R: Rng + ?Sized>(table: &EcdfTable, count: usize, rng: &mut R) -> Vec<usize> {
    let bucket = table.first_bucket();
    (0..count).map(|_| bucket.sample_rounded(rng)).collect()
}

/// Draw `count` aligned-region lengths, redrawing any below `min_length`.
pub fn draw_aligned_lengths<R: Rng + ?Sized>(
    table: &EcdfTable,
    count: usize,
    min_length: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Result<Vec<usize>> {
    let bucket = table.first_bucket();
    let mut lengths = Vec::with_capacity(count);
    for _ in 0..count {
        let mut drawn = None;
        for _ in 0..max_attempts {
            let len = bucket.sample_rounded(rng);
            if len >= min_length {
                drawn = Some(len);
                break;
            }
        }
        match drawn {
            Some(len) => lengths.push(len),
            None => return Err(SimError::exhausted("aligned length draw", max_attempts)),
        }
    }
    Ok(lengths)
}

fn load_ecdf(path: &Path) -> Result<EcdfTable> {
    let source = path.display().to_string();
    let parsed = parse_ecdf(open_profile(path)?, &source)?;
    build_ecdf(&parsed.keys, &parsed.rows)
        .map_err(|e| SimError::config(format!("{}: {}", source, e)))
}

/// Load every profile of one chemistry and plan read lengths for `read_count` reads.
///
/// Unaligned lengths are drawn before aligned lengths; this fixes which part of
/// the random stream each plan consumes.
pub fn load<R: Rng + ?Sized>(
    source: &ProfileSource,
    read_count: usize,
    config: &SimConfig,
    rng: &mut R,
) -> Result<ProfileBundle> {
    info!("Reading error profile for chemistry {}", source.chemistry);
    let model_path = source.model_profile_path();
    let params = parse_model_profile(open_profile(&model_path)?, &model_path.display().to_string())?;
    let mixtures = LengthMixtures::new(params)?;

    let markov_path = source.path("error_markov_model");
    let rows = parse_markov_model(open_profile(&markov_path)?, &markov_path.display().to_string())?;
    let transitions = TransitionTable::new(rows)?;

    let first_match = load_ecdf(&source.path("first_match.hist"))?;
    let match_length = load_ecdf(&source.path("match_markov_model"))?;

    info!("Reading ECDF of unaligned reads");
    let unaligned_path = source.path("unaligned_length_ecdf");
    let unaligned_name = unaligned_path.display().to_string();
    let (rate, unaligned_src) = parse_unaligned_profile(open_profile(&unaligned_path)?, &unaligned_name)?;
    let unaligned_table = build_ecdf(&unaligned_src.keys, &unaligned_src.rows)
        .map_err(|e| SimError::config(format!("{}: {}", unaligned_name, e)))?;

    let (aligned_count, unaligned_count) = partition_reads(read_count, rate, config.perfect);
    info!(
        "Planning {} aligned and {} unaligned reads",
        aligned_count, unaligned_count
    );
    let unaligned_lengths = draw_unaligned_lengths(&unaligned_table, unaligned_count, rng);

    info!("Reading ECDF of aligned reads");
    let align_ratio = load_ecdf(&source.path("align_ratio"))?;
    let ht_ratio = load_ecdf(&source.path("ht_ratio"))?;
    let length_suffix = if config.perfect {
        "aligned_reads_ecdf"
    } else {
        "aligned_length_ecdf"
    };
    let aligned_table = load_ecdf(&source.path(length_suffix))?;
    let ref_lengths = draw_aligned_lengths(
        &aligned_table,
        aligned_count,
        config.min_aligned_length,
        config.max_attempts,
        rng,
    )?;

    Ok(ProfileBundle {
        model: ErrorModel {
            mixtures,
            transitions,
            first_match,
            match_length,
            align_ratio,
            ht_ratio,
        },
        plan: ReadPlan {
            unaligned_lengths,
            ref_lengths,
        },
    })
}
