// src/sim/mutate.rs
use crate::model::markov::ErrorClass;
use crate::sim::schedule::ErrorSchedule;
use rand::Rng;
use tracing::debug;

pub const BASES: [u8; 4] = *b"ATCG";

/// Longest homopolymer allowed when homopolymer bias is on
pub const MAX_HOMOPOLYMER: usize = 5;

/// Bases of context inspected on each side of an edit
const FLANK: usize = 5;

/// Ground-truth row for one applied error
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    pub read_name: String,
    pub position: usize,
    pub class: ErrorClass,
    pub length: usize,
    pub ref_bases: String,
    pub read_bases: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mutated {
    pub sequence: Vec<u8>,
    /// Empty for unaligned reads
    pub records: Vec<ErrorRecord>,
}

/// Applies error schedules to extracted sequences
#[derive(Debug, Clone, Copy)]
pub struct Mutator {
    pub homopolymer_bias: bool,
    /// Redraws allowed per edit before the last draw is kept as is
    pub max_attempts: usize,
}

impl Mutator {
    pub fn new(homopolymer_bias: bool, max_attempts: usize) -> Self {
        Self {
            homopolymer_bias,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Apply `schedule` to `read` from the highest position down, so every
    /// edit sees coordinates untouched by the edits below it.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        read: &[u8],
        read_name: &str,
        schedule: &ErrorSchedule,
        aligned: bool,
        rng: &mut R,
    ) -> Mutated {
        let mut seq = read.to_vec();
        let mut records = Vec::new();

        for (pos, event) in schedule.iter_desc() {
            let k = pos.pos;
            let (ref_bases, read_bases, length) = match event.class {
                ErrorClass::Mismatch => {
                    if k >= seq.len() {
                        continue;
                    }
                    let len = event.length.min(seq.len() - k);
                    let original = seq[k..k + len].to_vec();
                    let new_bases = self.draw(&seq, k, k + len, rng, |rng| substitute(&original, rng));
                    seq.splice(k..k + len, new_bases.iter().copied());
                    (original, new_bases, len)
                }
                ErrorClass::Deletion => {
                    if k >= seq.len() {
                        continue;
                    }
                    let len = event.length.min(seq.len() - k);
                    let removed: Vec<u8> = seq.drain(k..k + len).collect();
                    (removed, vec![b'-'; len], len)
                }
                ErrorClass::Insertion => {
                    let k = k.min(seq.len());
                    let len = event.length;
                    let new_bases = self.draw(&seq, k, k, rng, |rng| random_bases(len, rng));
                    seq.splice(k..k, new_bases.iter().copied());
                    (vec![b'-'; len], new_bases, len)
                }
            };

            if aligned {
                records.push(ErrorRecord {
                    read_name: read_name.to_string(),
                    position: k,
                    class: event.class,
                    length,
                    ref_bases: String::from_utf8_lossy(&ref_bases).into_owned(),
                    read_bases: String::from_utf8_lossy(&read_bases).into_owned(),
                });
            }
        }

        if self.homopolymer_bias {
            seq = compress_homopolymers(&seq, MAX_HOMOPOLYMER);
        }
        Mutated { sequence: seq, records }
    }

    /// Draw replacement bases for `seq[start..end]`, redrawing while the bases
    /// plus their flanks contain an over-long homopolymer. Keeps the last draw
    /// once attempts run out; the final compression pass cleans up after it.
    fn draw<R, F>(&self, seq: &[u8], start: usize, end: usize, rng: &mut R, mut gen: F) -> Vec<u8>
    where
        R: Rng + ?Sized,
        F: FnMut(&mut R) -> Vec<u8>,
    {
        let mut candidate = gen(rng);
        if !self.homopolymer_bias {
            return candidate;
        }
        let left = &seq[start.saturating_sub(FLANK)..start];
        let right = &seq[end..(end + FLANK).min(seq.len())];
        for _ in 1..self.max_attempts {
            if !creates_homopolymer(left, &candidate, right) {
                return candidate;
            }
            candidate = gen(rng);
        }
        if creates_homopolymer(left, &candidate, right) {
            debug!("Keeping homopolymer-forming draw after {} attempts", self.max_attempts);
        }
        candidate
    }
}

/// One random base per original base, never equal to it.
fn substitute<R: Rng + ?Sized>(original: &[u8], rng: &mut R) -> Vec<u8> {
    original
        .iter()
        .map(|&b| {
            let b = b.to_ascii_uppercase();
            let alts: Vec<u8> = BASES.iter().copied().filter(|&x| x != b).collect();
            alts[rng.gen_range(0..alts.len())]
        })
        .collect()
}

pub fn random_bases<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<u8> {
    (0..len).map(|_| BASES[rng.gen_range(0..BASES.len())]).collect()
}

fn creates_homopolymer(left: &[u8], middle: &[u8], right: &[u8]) -> bool {
    let window: Vec<u8> = left.iter().chain(middle).chain(right).copied().collect();
    longest_homopolymer(&window) > MAX_HOMOPOLYMER
}

/// Length of the longest run of one nucleotide (A, C, G or T).
pub fn longest_homopolymer(seq: &[u8]) -> usize {
    let mut best = 0;
    let mut run = 0;
    let mut prev = 0u8;
    for &b in seq {
        if BASES.contains(&b) && b == prev {
            run += 1;
        } else if BASES.contains(&b) {
            run = 1;
        } else {
            run = 0;
        }
        prev = b;
        best = best.max(run);
    }
    best
}

/// Shorten every nucleotide run longer than `max_run` to exactly `max_run`.
pub fn compress_homopolymers(seq: &[u8], max_run: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(seq.len());
    let mut run = 0;
    for (i, &b) in seq.iter().enumerate() {
        if i > 0 && seq[i - 1] == b {
            run += 1;
        } else {
            run = 1;
        }
        if run <= max_run || !BASES.contains(&b) {
            out.push(b);
        }
    }
    out
}
