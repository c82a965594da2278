// src/sim/extract.rs
use crate::config::AddressingMode;
use crate::error::{Result, SimError};
use rand::Rng;
use tracing::debug;

/// Reference sequences in file order, with cached lengths
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    names: Vec<String>,
    seqs: Vec<Vec<u8>>,
    total_len: usize,
    max_len: usize,
}

impl ReferenceTable {
    pub fn from_records(records: Vec<(String, Vec<u8>)>) -> Self {
        let mut table = ReferenceTable::default();
        for (name, seq) in records {
            table.total_len += seq.len();
            table.max_len = table.max_len.max(seq.len());
            table.names.push(name);
            table.seqs.push(seq);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }

    /// Sum of all sequence lengths
    pub fn total_len(&self) -> usize {
        self.total_len
    }

    /// Length of the longest sequence
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.seqs[i].as_slice())
    }

    /// Fail early on references the addressing mode cannot serve.
    pub fn validate(&self, mode: AddressingMode) -> Result<()> {
        if self.total_len == 0 {
            return Err(SimError::config("reference genome is empty"));
        }
        if mode == AddressingMode::Circular && self.len() > 1 {
            return Err(SimError::config(format!(
                "circular mode needs a single-sequence reference, found {} sequences",
                self.len()
            )));
        }
        Ok(())
    }
}

/// A window taken from the reference
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub sequence: Vec<u8>,
    /// `<sequence name>_<start offset>`
    pub origin: String,
}

/// Pick a uniformly random window of `length` bases (clamped to the longest
/// sequence).
pub fn extract_read<R: Rng + ?Sized>(
    reference: &ReferenceTable,
    mode: AddressingMode,
    length: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Result<Extracted> {
    reference.validate(mode)?;
    let length = length.min(reference.max_len());
    match mode {
        AddressingMode::Circular => Ok(extract_circular(reference, length, rng)),
        AddressingMode::Linear => Ok(extract_linear(reference, length, max_attempts, rng)),
    }
}

fn extract_circular<R: Rng + ?Sized>(reference: &ReferenceTable, length: usize, rng: &mut R) -> Extracted {
    let seq = &reference.seqs[0];
    let genome_len = seq.len();
    let start = rng.gen_range(0..genome_len);
    let mut window = Vec::with_capacity(length);
    if start + length <= genome_len {
        window.extend_from_slice(&seq[start..start + length]);
    } else {
        window.extend_from_slice(&seq[start..]);
        window.extend_from_slice(&seq[..length - (genome_len - start)]);
    }
    Extracted {
        sequence: window,
        origin: format!("{}_{}", reference.names[0], start),
    }
}

fn window_at(reference: &ReferenceTable, idx: usize, start: usize, length: usize) -> Extracted {
    Extracted {
        sequence: reference.seqs[idx][start..start + length].to_vec(),
        origin: format!("{}_{}", reference.names[idx], start),
    }
}

/// Sequences are laid end to end; a draw whose window would run into the
/// next sequence is rejected and redrawn.
fn extract_linear<R: Rng + ?Sized>(
    reference: &ReferenceTable,
    length: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Extracted {
    for _ in 0..max_attempts {
        let mut offset = rng.gen_range(0..reference.total_len());
        for (idx, seq) in reference.seqs.iter().enumerate() {
            if offset + length <= seq.len() {
                return window_at(reference, idx, offset, length);
            } else if offset < seq.len() {
                break;
            }
            offset -= seq.len();
        }
    }

    // Rejection kept failing: draw directly among the valid starts, which
    // gives the same distribution.
    debug!(
        "Window rejection exhausted after {} attempts for length {}",
        max_attempts, length
    );
    let starts = |seq: &Vec<u8>| (seq.len() + 1).saturating_sub(length).min(seq.len());
    let valid: usize = reference.seqs.iter().map(starts).sum();
    let mut pick = rng.gen_range(0..valid);
    for (idx, seq) in reference.seqs.iter().enumerate() {
        let n = starts(seq);
        if pick < n {
            return window_at(reference, idx, pick, length);
        }
        pick -= n;
    }
    unreachable!("valid start index out of range")
}
