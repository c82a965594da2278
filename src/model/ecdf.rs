// src/model/ecdf.rs
use crate::error::{Result, SimError};
use rand::Rng;
use tracing::debug;

/// Integer range `[lo, hi)` identifying one class of events in a profile table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    pub lo: u64,
    pub hi: u64,
}

impl BucketKey {
    pub fn new(lo: u64, hi: u64) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, value: u64) -> bool {
        self.lo <= value && value < self.hi
    }
}

/// One row of a cumulative profile: a value range and the cumulative
/// probability reached at its upper end, one column per bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct EcdfRow {
    pub lo: f64,
    pub hi: f64,
    pub probs: Vec<f64>,
}

/// Probability interval `[p_lo, p_hi)` mapped linearly onto `[v_lo, v_hi]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EcdfInterval {
    pub p_lo: f64,
    pub p_hi: f64,
    pub v_lo: f64,
    pub v_hi: f64,
}

impl EcdfInterval {
    fn contains(&self, p: f64) -> bool {
        self.p_lo <= p && p < self.p_hi
    }

    fn interpolate(&self, p: f64) -> f64 {
        let width = self.p_hi - self.p_lo;
        if width <= 0.0 {
            return self.v_lo;
        }
        self.v_lo + (p - self.p_lo) / width * (self.v_hi - self.v_lo)
    }
}

/// Inverse CDF for a single bucket
#[derive(Debug, Clone, PartialEq)]
pub struct EcdfBucket {
    pub key: BucketKey,
    intervals: Vec<EcdfInterval>,
}

impl EcdfBucket {
    pub fn intervals(&self) -> &[EcdfInterval] {
        &self.intervals
    }

    /// Interval containing `p`. Intervals are contiguous and sorted, so the
    /// first one whose upper bound exceeds `p` is the match.
    pub fn interval_at(&self, p: f64) -> &EcdfInterval {
        let idx = self.intervals.partition_point(|iv| iv.p_hi <= p);
        let iv = &self.intervals[idx.min(self.intervals.len() - 1)];
        debug_assert!(iv.contains(p) || p >= 1.0 || p < 0.0);
        iv
    }

    /// Deterministic inverse transform for a given probability.
    pub fn value_at(&self, p: f64) -> f64 {
        self.interval_at(p).interpolate(p)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let p: f64 = rng.gen();
        self.value_at(p)
    }

    /// Sample rounded to the nearest non-negative integer.
    pub fn sample_rounded<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.sample(rng).round().max(0.0) as usize
    }

    /// Sample truncated toward zero, as used for match-run lengths.
    pub fn sample_floor<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.sample(rng).floor().max(0.0) as usize
    }
}

/// Empirical distribution table: buckets sorted by key, each an inverse CDF.
#[derive(Debug, Clone, PartialEq)]
pub struct EcdfTable {
    buckets: Vec<EcdfBucket>,
}

impl EcdfTable {
    pub fn buckets(&self) -> &[EcdfBucket] {
        &self.buckets
    }

    /// The bucket with the smallest key. Used for tables with one universal bucket.
    pub fn first_bucket(&self) -> &EcdfBucket {
        &self.buckets[0]
    }

    /// The bucket whose range contains `value`; values outside every range
    /// fall back to the first bucket (below) or the last bucket (above).
    pub fn bucket_for(&self, value: u64) -> &EcdfBucket {
        if let Some(b) = self.buckets.iter().find(|b| b.key.contains(value)) {
            return b;
        }
        if value < self.buckets[0].key.lo {
            &self.buckets[0]
        } else {
            &self.buckets[self.buckets.len() - 1]
        }
    }
}

/// Build an ECDF table from bucket keys (one per probability column) and
/// cumulative rows.
///
/// Runs of equal cumulative probability collapse into a single interval.
/// The first interval of each bucket has its lower value floored to
/// `hi - 10 * (hi - lo)` of the row that opens it, and the final interval
/// is stretched to probability 1 and to the largest value in the table.
pub fn build_ecdf(keys: &[BucketKey], rows: &[EcdfRow]) -> Result<EcdfTable> {
    if keys.is_empty() {
        return Err(SimError::config("ECDF table has no buckets"));
    }
    let lanes = keys.len();
    let mut intervals: Vec<Vec<EcdfInterval>> = vec![Vec::new(); lanes];
    let mut last_prob = vec![0.0f64; lanes];
    let mut last_value = vec![0.0f64; lanes];
    let mut global_max = f64::NEG_INFINITY;

    for (row_idx, row) in rows.iter().enumerate() {
        if row.probs.len() != lanes {
            return Err(SimError::config(format!(
                "ECDF row {} has {} probability columns, expected {}",
                row_idx + 1,
                row.probs.len(),
                lanes
            )));
        }
        global_max = global_max.max(row.hi);

        for lane in 0..lanes {
            let prob = row.probs[lane];
            if prob == last_prob[lane] {
                continue;
            }
            if prob < last_prob[lane] {
                return Err(SimError::config(format!(
                    "cumulative probability decreases in bucket {}-{} at row {}",
                    keys[lane].lo,
                    keys[lane].hi,
                    row_idx + 1
                )));
            }
            let v_lo = if last_prob[lane] != 0.0 {
                last_value[lane]
            } else {
                last_value[lane].max(row.hi - 10.0 * (row.hi - row.lo))
            };
            intervals[lane].push(EcdfInterval {
                p_lo: last_prob[lane],
                p_hi: prob,
                v_lo,
                v_hi: row.hi,
            });
            last_value[lane] = row.hi;
            last_prob[lane] = prob;
        }
    }

    let mut buckets = Vec::with_capacity(lanes);
    for (key, mut ivs) in keys.iter().copied().zip(intervals) {
        match ivs.last_mut() {
            Some(last) => {
                last.p_hi = 1.0;
                last.v_hi = global_max;
            }
            None => {
                debug!("Dropping empty ECDF bucket {}-{}", key.lo, key.hi);
                continue;
            }
        }
        buckets.push(EcdfBucket { key, intervals: ivs });
    }

    if buckets.is_empty() {
        return Err(SimError::config("ECDF table has no usable bucket"));
    }
    buckets.sort_by_key(|b| b.key);
    Ok(EcdfTable { buckets })
}
