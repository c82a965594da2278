// src/sim/simulator.rs
//! Read assembly: turns planned lengths into FASTA records, the error log and
//! per-read side files.

use crate::config::{ProfileSource, SimConfig};
use crate::error::{Result, SimError};
use crate::io::error_log::ErrorLog;
use crate::io::fasta::{load_reference, FastaWriter};
use crate::io::report::{write_summary, ErrorCounts, ReadLayout, ReadLayouts, RunSummary};
use crate::model::markov::ErrorClass;
use crate::model::profile::{self, ProfileBundle};
use crate::sim::error_chain::{error_list, unaligned_error_list};
use crate::sim::extract::{extract_read, ReferenceTable};
use crate::sim::mutate::{random_bases, ErrorRecord, Mutator};
use bio::alphabets::dna::revcomp;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

const PROGRESS_INTERVAL: usize = 1000;

/// Where a run writes its files
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub prefix: String,
    /// Gzip the reads file
    pub compress: bool,
}

impl OutputOptions {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            compress: false,
        }
    }

    pub fn reads_path(&self) -> PathBuf {
        let ext = if self.compress { "fasta.gz" } else { "fasta" };
        PathBuf::from(format!("{}_reads.{}", self.prefix, ext))
    }

    pub fn error_log_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_error_profile", self.prefix))
    }

    pub fn summary_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_summary.json", self.prefix))
    }
}

/// One finished read
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedRead {
    pub header: String,
    pub sequence: Vec<u8>,
    pub errors: Vec<ErrorRecord>,
    /// Set for error-bearing aligned reads only
    pub layout: Option<ReadLayout>,
}

/// Totals gathered while writing reads
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub unaligned_reads: usize,
    pub aligned_reads: usize,
    pub bases_written: usize,
    pub errors: ErrorCounts,
}

impl RunStats {
    fn record(&mut self, read: &SimulatedRead) {
        self.bases_written += read.sequence.len();
        for error in &read.errors {
            match error.class {
                ErrorClass::Mismatch => self.errors.mismatch += 1,
                ErrorClass::Insertion => self.errors.insertion += 1,
                ErrorClass::Deletion => self.errors.deletion += 1,
            }
        }
    }
}

/// Everything one simulation run reads from, plus its random source
pub struct Simulator<R: Rng> {
    reference: ReferenceTable,
    bundle: ProfileBundle,
    config: SimConfig,
    mutator: Mutator,
    rng: R,
}

impl<R: Rng> Simulator<R> {
    pub fn new(reference: ReferenceTable, bundle: ProfileBundle, config: SimConfig, rng: R) -> Result<Self> {
        reference.validate(config.mode)?;
        let mutator = Mutator::new(config.homopolymer_bias, config.max_attempts);
        Ok(Self {
            reference,
            bundle,
            config,
            mutator,
            rng,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn bundle(&self) -> &ProfileBundle {
        &self.bundle
    }

    /// Read with no reference alignment: errors come from the fixed per-step
    /// weights and are not logged.
    pub fn unaligned_read(&mut self, index: usize, length: usize) -> Result<SimulatedRead> {
        let (length, schedule) =
            unaligned_error_list(length, &self.bundle.model.mixtures, &mut self.rng)?;
        let window = extract_read(
            &self.reference,
            self.config.mode,
            length,
            self.config.max_attempts,
            &mut self.rng,
        )?;
        let mutated = self
            .mutator
            .apply(&window.sequence, &window.origin, &schedule, false, &mut self.rng);
        Ok(SimulatedRead {
            header: format!("{}_{}-{}", window.origin, length, index),
            sequence: mutated.sequence,
            errors: mutated.records,
            layout: None,
        })
    }

    /// Error-free window of `length` bases.
    pub fn perfect_read(&mut self, index: usize, length: usize) -> Result<SimulatedRead> {
        let window = extract_read(
            &self.reference,
            self.config.mode,
            length,
            self.config.max_attempts,
            &mut self.rng,
        )?;
        Ok(SimulatedRead {
            header: format!("{}_{}_{}", window.origin, length, index),
            sequence: window.sequence,
            errors: Vec::new(),
            layout: None,
        })
    }

    /// Aligned read: mutated middle region flanked by random head and tail,
    /// reverse-complemented half of the time.
    pub fn aligned_read(&mut self, index: usize, ref_length: usize) -> Result<SimulatedRead> {
        let chain = error_list(ref_length, &self.bundle.model, &self.config.weights, &mut self.rng)?;
        let middle = chain.read_len;
        let (aligned, ratio) = self.draw_total_length(middle)?;
        let remainder = aligned.saturating_sub(middle);
        let (head, tail) = self.split_remainder(remainder);

        let window = extract_read(
            &self.reference,
            self.config.mode,
            chain.ref_len,
            self.config.max_attempts,
            &mut self.rng,
        )?;
        let mutated = self
            .mutator
            .apply(&window.sequence, &window.origin, &chain.schedule, true, &mut self.rng);

        // Windows are clamped to the longest sequence; report what was produced.
        let (middle, middle_ref) = if window.sequence.len() < chain.ref_len {
            debug!(
                "Read {}: {}-base window clipped to {} bases of reference",
                index,
                chain.ref_len,
                window.sequence.len()
            );
            (mutated.sequence.len(), window.sequence.len())
        } else {
            (middle, chain.ref_len)
        };

        let mut sequence = random_bases(head, &mut self.rng);
        sequence.extend_from_slice(&mutated.sequence);
        sequence.extend(random_bases(tail, &mut self.rng));
        if self.rng.gen::<f64>() < 0.5 {
            sequence = revcomp(&sequence);
        }

        Ok(SimulatedRead {
            header: format!("{}_{}_{}_{}-{}", window.origin, head, middle, tail, index),
            sequence,
            errors: mutated.records,
            layout: Some(ReadLayout {
                head,
                middle,
                tail,
                aligned,
                remainder,
                ratio,
                middle_ref,
            }),
        })
    }

    /// Total read length from the align-ratio table, redrawn until it reaches
    /// the configured minimum.
    fn draw_total_length(&mut self, middle: usize) -> Result<(usize, f64)> {
        let bucket = self.bundle.model.align_ratio.bucket_for(middle as u64);
        for _ in 0..self.config.max_attempts {
            let ratio = bucket.sample(&mut self.rng);
            if ratio <= 0.0 {
                continue;
            }
            let total = (middle as f64 / ratio).round() as usize;
            if total >= self.config.min_total_length {
                return Ok((total, ratio));
            }
        }
        Err(SimError::exhausted(
            format!("align ratio draw for a {}-base middle", middle),
            self.config.max_attempts,
        ))
    }

    fn split_remainder(&mut self, remainder: usize) -> (usize, usize) {
        if remainder == 0 {
            return (0, 0);
        }
        let bucket = self.bundle.model.ht_ratio.bucket_for(remainder as u64);
        let ratio = bucket.sample(&mut self.rng).clamp(0.0, 1.0);
        let head = ((remainder as f64 * ratio).round() as usize).min(remainder);
        (head, remainder - head)
    }

    /// Simulate every planned read, unaligned first, and write all outputs.
    pub fn run(&mut self, output: &OutputOptions) -> Result<RunStats> {
        let mut reads = FastaWriter::new(&output.reads_path())?;
        let mut log = ErrorLog::create(&output.error_log_path())?;
        let mut stats = RunStats::default();
        let plan = self.bundle.plan.clone();
        let total = plan.total();

        info!("Start simulation of {} unaligned reads", plan.unaligned_lengths.len());
        for (i, &length) in plan.unaligned_lengths.iter().enumerate() {
            let read = self.unaligned_read(i, length)?;
            reads.write_record(&read.header, &read.sequence)?;
            stats.record(&read);
            stats.unaligned_reads += 1;
            report_progress(stats.unaligned_reads, total);
        }

        info!("Start simulation of {} aligned reads", plan.ref_lengths.len());
        let mut layouts = ReadLayouts::default();
        for (i, &ref_length) in plan.ref_lengths.iter().enumerate() {
            let read = if self.config.perfect {
                self.perfect_read(i, ref_length)?
            } else {
                self.aligned_read(i, ref_length)?
            };
            reads.write_record(&read.header, &read.sequence)?;
            log.write_all(&read.errors)?;
            if let Some(layout) = read.layout {
                layouts.push(layout);
            }
            stats.record(&read);
            stats.aligned_reads += 1;
            report_progress(stats.unaligned_reads + stats.aligned_reads, total);
        }

        reads.finish()?;
        debug!("Wrote {} error log rows", log.rows());
        log.finish()?;
        if !self.config.perfect {
            layouts.write(&output.prefix)?;
        }
        Ok(stats)
    }
}

fn report_progress(done: usize, total: usize) {
    if done % PROGRESS_INTERVAL == 0 {
        info!("Simulated {}/{} reads", done, total);
    }
}

/// Load inputs, simulate `read_count` reads and write every output file.
pub fn run_simulation(
    reference: &Path,
    profiles: &ProfileSource,
    read_count: usize,
    config: SimConfig,
    output: &OutputOptions,
) -> Result<RunSummary> {
    let start = Instant::now();
    let seed = config.seed.unwrap_or_else(rand::random);
    info!("Using random seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let reference = load_reference(reference)?;
    reference.validate(config.mode)?;
    let bundle = profile::load(profiles, read_count, &config, &mut rng)?;

    let mut simulator = Simulator::new(reference, bundle, config, rng)?;
    let stats = simulator.run(output)?;

    let config = simulator.config();
    let summary = RunSummary {
        seed,
        chemistry: profiles.chemistry,
        mode: config.mode,
        perfect: config.perfect,
        unaligned_reads: stats.unaligned_reads,
        aligned_reads: stats.aligned_reads,
        bases_written: stats.bases_written,
        errors: stats.errors,
        elapsed_secs: start.elapsed().as_secs_f64(),
    };
    write_summary(&summary, &output.summary_path())?;
    info!(
        "Finished {} reads in {:.2}s",
        summary.unaligned_reads + summary.aligned_reads,
        summary.elapsed_secs
    );
    Ok(summary)
}
