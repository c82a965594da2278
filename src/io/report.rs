// src/io/report.rs
use crate::config::{AddressingMode, Chemistry};
use serde::Serialize;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Per-read layout of aligned reads, one column per side file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadLayouts {
    pub head: Vec<usize>,
    pub middle: Vec<usize>,
    pub tail: Vec<usize>,
    /// Total read length implied by the align ratio
    pub aligned: Vec<usize>,
    /// Unaligned remainder split into head and tail
    pub remainder: Vec<usize>,
    pub ratio: Vec<f64>,
    pub middle_ref: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadLayout {
    pub head: usize,
    pub middle: usize,
    pub tail: usize,
    pub aligned: usize,
    pub remainder: usize,
    pub ratio: f64,
    pub middle_ref: usize,
}

impl ReadLayouts {
    pub fn push(&mut self, layout: ReadLayout) {
        self.head.push(layout.head);
        self.middle.push(layout.middle);
        self.tail.push(layout.tail);
        self.aligned.push(layout.aligned);
        self.remainder.push(layout.remainder);
        self.ratio.push(layout.ratio);
        self.middle_ref.push(layout.middle_ref);
    }

    pub fn len(&self) -> usize {
        self.middle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }

    /// Write `<prefix>_head`, `_middle`, `_tail`, `_aligned`, `_ht`, `_ratio`
    /// and `_middle_ref`, one value per line.
    pub fn write(&self, prefix: &str) -> io::Result<()> {
        write_column(&side_path(prefix, "head"), &self.head)?;
        write_column(&side_path(prefix, "middle"), &self.middle)?;
        write_column(&side_path(prefix, "tail"), &self.tail)?;
        write_column(&side_path(prefix, "aligned"), &self.aligned)?;
        write_column(&side_path(prefix, "ht"), &self.remainder)?;
        write_column(&side_path(prefix, "ratio"), &self.ratio)?;
        write_column(&side_path(prefix, "middle_ref"), &self.middle_ref)?;
        Ok(())
    }
}

pub fn side_path(prefix: &str, suffix: &str) -> String {
    format!("{}_{}", prefix, suffix)
}

fn write_column<T: Display>(path: &str, values: &[T]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for value in values {
        writeln!(writer, "{}", value)?;
    }
    writer.flush()
}

/// Error events written to the log, by class
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct ErrorCounts {
    pub mismatch: usize,
    pub insertion: usize,
    pub deletion: usize,
}

/// Machine-readable record of one run
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub seed: u64,
    pub chemistry: Chemistry,
    pub mode: AddressingMode,
    pub perfect: bool,
    pub unaligned_reads: usize,
    pub aligned_reads: usize,
    pub bases_written: usize,
    pub errors: ErrorCounts,
    pub elapsed_secs: f64,
}

pub fn write_summary(summary: &RunSummary, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}
