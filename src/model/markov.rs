// src/model/markov.rs
use crate::error::{Result, SimError};
use rand::Rng;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Kind of a non-match error event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorClass {
    Mismatch,
    Insertion,
    Deletion,
}

impl ErrorClass {
    pub const ALL: [ErrorClass; 3] = [ErrorClass::Mismatch, ErrorClass::Insertion, ErrorClass::Deletion];

    /// Short tag used in profile files and the ground-truth log.
    pub fn tag(&self) -> &'static str {
        match self {
            ErrorClass::Mismatch => "mis",
            ErrorClass::Insertion => "ins",
            ErrorClass::Deletion => "del",
        }
    }

    /// Whether the event consumes reference-space positions.
    pub fn consumes_reference(&self) -> bool {
        !matches!(self, ErrorClass::Insertion)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// State of the error chain: what happened last.
///
/// `Match0` marks an error that was followed by a zero-length match run;
/// it selects a separate transition row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainState {
    Start,
    Mismatch,
    Insertion,
    Deletion,
    Match0(ErrorClass),
}

impl ChainState {
    pub fn after(class: ErrorClass) -> Self {
        match class {
            ErrorClass::Mismatch => ChainState::Mismatch,
            ErrorClass::Insertion => ChainState::Insertion,
            ErrorClass::Deletion => ChainState::Deletion,
        }
    }

    /// The same state carrying the zero-length-match marker. `Start` and
    /// states already marked are returned unchanged.
    pub fn with_zero_match(self) -> Self {
        match self {
            ChainState::Mismatch => ChainState::Match0(ErrorClass::Mismatch),
            ChainState::Insertion => ChainState::Match0(ErrorClass::Insertion),
            ChainState::Deletion => ChainState::Match0(ErrorClass::Deletion),
            other => other,
        }
    }

    /// Every state that needs a transition row.
    pub fn all() -> [ChainState; 7] {
        [
            ChainState::Start,
            ChainState::Mismatch,
            ChainState::Insertion,
            ChainState::Deletion,
            ChainState::Match0(ErrorClass::Mismatch),
            ChainState::Match0(ErrorClass::Insertion),
            ChainState::Match0(ErrorClass::Deletion),
        ]
    }
}

impl fmt::Display for ChainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainState::Start => f.write_str("start"),
            ChainState::Mismatch => f.write_str("mis"),
            ChainState::Insertion => f.write_str("ins"),
            ChainState::Deletion => f.write_str("del"),
            ChainState::Match0(class) => write!(f, "{}0", class.tag()),
        }
    }
}

impl FromStr for ChainState {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "start" => Ok(ChainState::Start),
            "mis" => Ok(ChainState::Mismatch),
            "ins" => Ok(ChainState::Insertion),
            "del" => Ok(ChainState::Deletion),
            "mis0" => Ok(ChainState::Match0(ErrorClass::Mismatch)),
            "ins0" => Ok(ChainState::Match0(ErrorClass::Insertion)),
            "del0" => Ok(ChainState::Match0(ErrorClass::Deletion)),
            other => Err(SimError::config(format!("unknown error chain state '{}'", other))),
        }
    }
}

/// Next-error probabilities for one state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionRow {
    pub mismatch: f64,
    pub insertion: f64,
    pub deletion: f64,
}

impl TransitionRow {
    pub fn new(mismatch: f64, insertion: f64, deletion: f64) -> Result<Self> {
        if [mismatch, insertion, deletion].iter().any(|p| !(0.0..=1.0).contains(p)) {
            return Err(SimError::config(format!(
                "transition probabilities must lie in [0, 1]: {} {} {}",
                mismatch, insertion, deletion
            )));
        }
        Ok(Self { mismatch, insertion, deletion })
    }

    /// Mismatch on `[0, mis)`, insertion on `[mis, mis + ins)`, deletion on the
    /// rest. Rows that do not sum to 1 leave their slack to deletion.
    pub fn pick(&self, p: f64) -> ErrorClass {
        if p < self.mismatch {
            ErrorClass::Mismatch
        } else if p < self.mismatch + self.insertion {
            ErrorClass::Insertion
        } else {
            ErrorClass::Deletion
        }
    }
}

/// Markov transition table over error chain states.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionTable {
    rows: HashMap<ChainState, TransitionRow>,
}

impl TransitionTable {
    /// Build from explicit rows; every reachable state must be present.
    pub fn new(rows: HashMap<ChainState, TransitionRow>) -> Result<Self> {
        for state in ChainState::all() {
            if !rows.contains_key(&state) {
                return Err(SimError::config(format!(
                    "error Markov model has no row for state '{}'",
                    state
                )));
            }
        }
        Ok(Self { rows })
    }

    pub fn row(&self, state: ChainState) -> &TransitionRow {
        &self.rows[&state]
    }

    pub fn next<R: Rng + ?Sized>(&self, state: ChainState, rng: &mut R) -> ErrorClass {
        let p: f64 = rng.gen();
        self.row(state).pick(p)
    }
}
