// src/sim/schedule.rs
use crate::model::markov::ErrorClass;
use std::collections::BTreeMap;

/// Whether an event sits on a base or in the gap just before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    Before,
    At,
}

/// Position of an event in reference-space coordinates. An insertion before
/// base `k` orders between base `k - 1` and base `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventPos {
    pub pos: usize,
    pub slot: Slot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorEvent {
    pub class: ErrorClass,
    pub length: usize,
}

/// Ordered error events for one read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorSchedule {
    events: BTreeMap<EventPos, ErrorEvent>,
}

impl ErrorSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mismatch or deletion starting at base `pos`. Zero-length events are ignored.
    pub fn insert_at(&mut self, pos: usize, class: ErrorClass, length: usize) {
        debug_assert!(class.consumes_reference());
        if length == 0 {
            return;
        }
        self.events.insert(
            EventPos { pos, slot: Slot::At },
            ErrorEvent { class, length },
        );
    }

    /// Record an insertion before base `pos`; a second insertion at the same
    /// gap extends the first.
    pub fn insert_before(&mut self, pos: usize, length: usize) {
        if length == 0 {
            return;
        }
        self.events
            .entry(EventPos { pos, slot: Slot::Before })
            .and_modify(|e| e.length += length)
            .or_insert(ErrorEvent {
                class: ErrorClass::Insertion,
                length,
            });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EventPos, &ErrorEvent)> {
        self.events.iter()
    }

    /// Events from the highest position to the lowest, the order in which
    /// they must be applied.
    pub fn iter_desc(&self) -> impl Iterator<Item = (&EventPos, &ErrorEvent)> {
        self.events.iter().rev()
    }

    /// Sum of event lengths for one class
    pub fn total(&self, class: ErrorClass) -> usize {
        self.events
            .values()
            .filter(|e| e.class == class)
            .map(|e| e.length)
            .sum()
    }
}
