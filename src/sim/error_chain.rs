// src/sim/error_chain.rs
//! Error schedules drawn from the profile's Markov chain.
//!
//! Two coordinate systems are tracked: reference space (bases taken from the
//! genome window) and read space (bases in the simulated read). Mismatches
//! and deletions consume reference bases; insertions only add read bases.

use crate::config::ClassWeights;
use crate::error::Result;
use crate::model::markov::{ChainState, ErrorClass};
use crate::model::mixture::LengthMixtures;
use crate::model::profile::ErrorModel;
use crate::sim::schedule::ErrorSchedule;
use rand::Rng;

/// Per-step outcome weights for unaligned reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepWeights {
    pub matches: f64,
    pub mismatch: f64,
    pub insertion: f64,
    pub deletion: f64,
}

pub const UNALIGNED_STEP_WEIGHTS: StepWeights = StepWeights {
    matches: 0.4,
    mismatch: 0.3,
    insertion: 0.15,
    deletion: 0.15,
};

impl StepWeights {
    fn pick(&self, p: f64) -> Option<ErrorClass> {
        if p < self.matches {
            None
        } else if p < self.matches + self.mismatch {
            Some(ErrorClass::Mismatch)
        } else if p < self.matches + self.mismatch + self.insertion {
            Some(ErrorClass::Insertion)
        } else {
            Some(ErrorClass::Deletion)
        }
    }
}

/// Result of walking the chain for an aligned read
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutcome {
    /// Length of the mutated region in read space
    pub read_len: usize,
    /// Reference bases the schedule spans; never below the requested length
    pub ref_len: usize,
    pub schedule: ErrorSchedule,
}

/// Error schedule for an unaligned read of `length` output bases.
///
/// Returns the (possibly extended) length alongside the schedule: an error
/// run that overshoots the target extends it rather than being truncated.
pub fn unaligned_error_list<R: Rng + ?Sized>(
    length: usize,
    mixtures: &LengthMixtures,
    rng: &mut R,
) -> Result<(usize, ErrorSchedule)> {
    unaligned_error_list_weighted(length, &UNALIGNED_STEP_WEIGHTS, mixtures, rng)
}

pub fn unaligned_error_list_weighted<R: Rng + ?Sized>(
    mut length: usize,
    weights: &StepWeights,
    mixtures: &LengthMixtures,
    rng: &mut R,
) -> Result<(usize, ErrorSchedule)> {
    let mut schedule = ErrorSchedule::new();
    let mut pos = 0usize;

    while pos < length {
        let p: f64 = rng.gen();
        let step = match weights.pick(p) {
            None => 1,
            Some(ErrorClass::Insertion) => {
                let step = mixtures.sample(ErrorClass::Insertion, rng)?;
                schedule.insert_before(pos, step);
                continue;
            }
            Some(class) => {
                let step = mixtures.sample(class, rng)?;
                schedule.insert_at(pos, class, step);
                step
            }
        };
        pos += step;
        length = length.max(pos);
    }

    Ok((length, schedule))
}

/// Error schedule for an aligned read spanning `target_ref` reference bases.
///
/// Error runs alternate with match runs. The first match comes from the
/// first-match table (at least 2 bases); later matches are bucketed by the
/// previous match length and never two zero-length matches in a row.
pub fn error_list<R: Rng + ?Sized>(
    target_ref: usize,
    model: &ErrorModel,
    weights: &ClassWeights,
    rng: &mut R,
) -> Result<ChainOutcome> {
    let mut schedule = ErrorSchedule::new();
    let mut ref_len = target_ref;
    let mut inserted = 0usize;
    let mut deleted = 0usize;
    let mut state = ChainState::Start;

    let mut last_match = model.first_match.first_bucket().sample_floor(rng).max(2);
    let mut pos = last_match;
    ref_len = ref_len.max(pos);

    while pos < ref_len {
        let class = model.transitions.next(state, rng);
        let step = model.mixtures.sample_weighted(class, weights.get(class), rng)?;
        match class {
            ErrorClass::Insertion => {
                schedule.insert_before(pos, step);
                inserted += step;
            }
            ErrorClass::Mismatch | ErrorClass::Deletion => {
                schedule.insert_at(pos, class, step);
                if class == ErrorClass::Deletion {
                    deleted += step;
                }
                pos += step;
                ref_len = ref_len.max(pos);
            }
        }
        state = ChainState::after(class);

        let bucket = model.match_length.bucket_for(last_match as u64);
        let mut run = bucket.sample_floor(rng);
        if last_match == 0 && run == 0 {
            run = 1;
        }
        last_match = run;
        pos += run;
        ref_len = ref_len.max(pos);
        if run == 0 {
            state = state.with_zero_match();
        }
    }

    Ok(ChainOutcome {
        read_len: ref_len + inserted - deleted,
        ref_len,
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::schedule::Slot;
    use crate::model::ecdf::BucketKey;
    use crate::model::markov::{TransitionRow, TransitionTable};
    use crate::sim::test_utils::{mixtures, table, test_model};
    use std::collections::HashMap;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_degenerate_unaligned_reaches_target() {
        let only_matches = StepWeights { matches: 1.0, mismatch: 0.0, insertion: 0.0, deletion: 0.0 };
        let mut rng = StdRng::seed_from_u64(2);
        let (len, schedule) =
            unaligned_error_list_weighted(250, &only_matches, &mixtures(), &mut rng).unwrap();
        assert_eq!(len, 250);
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_unaligned_length_never_shrinks() {
        let mut rng = StdRng::seed_from_u64(21);
        for target in [1usize, 10, 500] {
            let (len, schedule) = unaligned_error_list(target, &mixtures(), &mut rng).unwrap();
            assert!(len >= target);
            for (pos, event) in schedule.iter() {
                assert!(pos.pos < len);
                if event.class == ErrorClass::Insertion {
                    assert_eq!(pos.slot, Slot::Before);
                }
            }
        }
    }

    #[test]
    fn test_unaligned_insertions_merge_at_cursor() {
        let only_ins = StepWeights { matches: 0.5, mismatch: 0.0, insertion: 0.5, deletion: 0.0 };
        let mut rng = StdRng::seed_from_u64(8);
        let (len, schedule) =
            unaligned_error_list_weighted(300, &only_ins, &mixtures(), &mut rng).unwrap();
        assert_eq!(len, 300);
        let mut seen = std::collections::HashSet::new();
        for (pos, _) in schedule.iter() {
            assert!(seen.insert(pos.pos));
        }
    }

    #[test]
    fn test_aligned_lengths_account_for_drift() {
        let model = test_model();
        let mut rng = StdRng::seed_from_u64(42);
        for target in [80usize, 500, 3000] {
            let out = error_list(target, &model, &ClassWeights::default(), &mut rng).unwrap();
            assert!(out.ref_len >= target);
            let ins = out.schedule.total(ErrorClass::Insertion);
            let del = out.schedule.total(ErrorClass::Deletion);
            assert_eq!(out.read_len + del, out.ref_len + ins);
            for (pos, event) in out.schedule.iter() {
                assert!(pos.pos < out.ref_len);
                if event.class.consumes_reference() {
                    assert!(pos.pos + event.length <= out.ref_len);
                }
            }
        }
    }

    #[test]
    fn test_zero_weights_produce_clean_schedule() {
        let model = test_model();
        let weights = ClassWeights { mismatch: 0.0, insertion: 0.0, deletion: 0.0 };
        let mut rng = StdRng::seed_from_u64(4);
        let out = error_list(400, &model, &weights, &mut rng).unwrap();
        assert!(out.schedule.is_empty());
        assert_eq!(out.read_len, out.ref_len);
    }

    #[test]
    fn test_zero_match_switches_row_and_never_repeats() {
        // Match runs are always 0; Match0 rows pick deletion, every other row mismatch.
        let mut model = test_model();
        let single = [BucketKey::new(0, 1)];
        model.first_match = table(&single, &[(5.0, 5.0, 1.0)]);
        model.match_length = table(&single, &[(0.0, 0.0, 1.0)]);
        let rows: HashMap<ChainState, TransitionRow> = ChainState::all()
            .into_iter()
            .map(|s| {
                let row = match s {
                    ChainState::Match0(_) => TransitionRow::new(0.0, 0.0, 1.0),
                    _ => TransitionRow::new(1.0, 0.0, 0.0),
                };
                (s, row.unwrap())
            })
            .collect();
        model.transitions = TransitionTable::new(rows).unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let out = error_list(200, &model, &ClassWeights::default(), &mut rng).unwrap();
        let events: Vec<(usize, ErrorClass, usize)> = out
            .schedule
            .iter()
            .map(|(pos, e)| (pos.pos, e.class, e.length))
            .collect();
        assert!(events.len() > 2);
        assert_eq!(events[0].0, 5);

        for (i, pair) in events.windows(2).enumerate() {
            let (pos, class, len) = pair[0];
            let (next_pos, next_class, _) = pair[1];
            if i % 2 == 0 {
                assert_eq!(class, ErrorClass::Mismatch);
                assert_eq!(next_class, ErrorClass::Deletion);
                // zero-length match straight after the mismatch
                assert_eq!(next_pos, pos + len);
            } else {
                assert_eq!(class, ErrorClass::Deletion);
                assert_eq!(next_class, ErrorClass::Mismatch);
                // a second zero-length match is forced to 1
                assert_eq!(next_pos, pos + len + 1);
            }
        }
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let model = test_model();
        let a = error_list(1000, &model, &ClassWeights::default(), &mut StdRng::seed_from_u64(9)).unwrap();
        let b = error_list(1000, &model, &ClassWeights::default(), &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }
}
