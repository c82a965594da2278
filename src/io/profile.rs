// src/io/profile.rs
//! Readers for the tab-delimited profile files produced by profile training.
//! Each parser turns text into numeric rows; building models from those rows
//! happens in `model`.

use crate::error::{Result, SimError};
use crate::model::ecdf::{BucketKey, EcdfRow};
use crate::model::markov::{ChainState, TransitionRow};
use crate::model::mixture::MixtureParams;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Bucket header plus cumulative rows of one ECDF profile
#[derive(Debug, Clone, PartialEq)]
pub struct EcdfSource {
    pub keys: Vec<BucketKey>,
    pub rows: Vec<EcdfRow>,
}

/// Open a profile file. A missing or unreadable profile is a configuration error.
pub fn open_profile(path: &Path) -> Result<BufReader<File>> {
    File::open(path).map(BufReader::new).map_err(|e| {
        SimError::config(format!("cannot open profile file {}: {}", path.display(), e))
    })
}

/// Non-blank lines split on whitespace, numbered from 1.
fn split_lines<R: BufRead>(reader: R, source: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| {
            SimError::config(format!("cannot read profile file {}: {}", source, e))
        })?;
        let fields: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if !fields.is_empty() {
            out.push((idx + 1, fields));
        }
    }
    Ok(out)
}

fn parse_error(source: &str, line: usize, message: impl Into<String>) -> SimError {
    SimError::Parse {
        path: source.to_string(),
        line,
        message: message.into(),
    }
}

fn parse_f64(field: &str, source: &str, line: usize) -> Result<f64> {
    field
        .parse::<f64>()
        .map_err(|_| parse_error(source, line, format!("'{}' is not a number", field)))
}

fn parse_range<T: std::str::FromStr>(field: &str, source: &str, line: usize) -> Result<(T, T)> {
    let bad = || parse_error(source, line, format!("'{}' is not a lo-hi range", field));
    let (lo, hi) = field.split_once('-').ok_or_else(bad)?;
    Ok((lo.parse().map_err(|_| bad())?, hi.parse().map_err(|_| bad())?))
}

fn ecdf_from_lines(lines: &[(usize, Vec<String>)], source: &str) -> Result<EcdfSource> {
    let (header_line, header) = lines
        .first()
        .ok_or_else(|| SimError::config(format!("profile file {} is empty", source)))?;

    let mut keys = Vec::with_capacity(header.len().saturating_sub(1));
    for field in &header[1..] {
        let (lo, hi): (u64, u64) = parse_range(field, source, *header_line)?;
        keys.push(BucketKey::new(lo, hi));
    }

    let mut rows = Vec::with_capacity(lines.len() - 1);
    for (line, fields) in &lines[1..] {
        let (lo, hi): (f64, f64) = parse_range(&fields[0], source, *line)?;
        let probs = fields[1..]
            .iter()
            .map(|f| parse_f64(f, source, *line))
            .collect::<Result<Vec<_>>>()?;
        rows.push(EcdfRow { lo, hi, probs });
    }
    Ok(EcdfSource { keys, rows })
}

/// Parse an ECDF profile: a header of `lo-hi` bucket ranges, then one row per
/// value range with a cumulative probability for each bucket.
pub fn parse_ecdf<R: BufRead>(reader: R, source: &str) -> Result<EcdfSource> {
    let lines = split_lines(reader, source)?;
    ecdf_from_lines(&lines, source)
}

/// Parse the unaligned-length profile, whose first line carries the
/// aligned:unaligned read rate ahead of a regular ECDF block.
pub fn parse_unaligned_profile<R: BufRead>(mut reader: R, source: &str) -> Result<(f64, EcdfSource)> {
    let mut first = String::new();
    reader
        .read_line(&mut first)
        .map_err(|e| SimError::config(format!("cannot read profile file {}: {}", source, e)))?;
    let rate_field = first
        .trim_end()
        .split('\t')
        .nth(1)
        .ok_or_else(|| parse_error(source, 1, "missing aligned/unaligned rate"))?;
    let rate = parse_f64(rate_field.trim(), source, 1)?;

    let mut lines = split_lines(reader, source)?;
    for (line, _) in lines.iter_mut() {
        *line += 1;
    }
    let ecdf = ecdf_from_lines(&lines, source)?;
    Ok((rate, ecdf))
}

/// Parse the mixture-model profile: header, then one row per error class.
pub fn parse_model_profile<R: BufRead>(reader: R, source: &str) -> Result<MixtureParams> {
    let lines = split_lines(reader, source)?;
    let mut mismatch = None;
    let mut insertion = None;
    let mut deletion = None;

    for (line, fields) in lines.iter().skip(1) {
        if fields.len() < 5 {
            return Err(parse_error(source, *line, "expected a name and four parameters"));
        }
        let mut par = [0.0; 4];
        for (slot, field) in par.iter_mut().zip(&fields[1..5]) {
            *slot = parse_f64(field, source, *line)?;
        }
        let name = fields[0].as_str();
        if name.contains("mismatch") {
            mismatch = Some(par);
        } else if name.contains("insertion") {
            insertion = Some(par);
        } else {
            deletion = Some(par);
        }
    }

    let missing = |class: &str| SimError::config(format!("{} has no {} parameters", source, class));
    Ok(MixtureParams {
        mismatch: mismatch.ok_or_else(|| missing("mismatch"))?,
        insertion: insertion.ok_or_else(|| missing("insertion"))?,
        deletion: deletion.ok_or_else(|| missing("deletion"))?,
    })
}

/// Parse the error Markov model: header, then `state p_mis p_ins p_del` rows.
pub fn parse_markov_model<R: BufRead>(
    reader: R,
    source: &str,
) -> Result<HashMap<ChainState, TransitionRow>> {
    let lines = split_lines(reader, source)?;
    let mut rows = HashMap::new();
    for (line, fields) in lines.iter().skip(1) {
        if fields.len() < 4 {
            return Err(parse_error(source, *line, "expected a state and three probabilities"));
        }
        let state: ChainState = fields[0].parse()?;
        let row = TransitionRow::new(
            parse_f64(&fields[1], source, *line)?,
            parse_f64(&fields[2], source, *line)?,
            parse_f64(&fields[3], source, *line)?,
        )?;
        rows.insert(state, row);
    }
    Ok(rows)
}
