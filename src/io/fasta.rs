// src/io/fasta.rs
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use bio::io::fasta;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::info;

use crate::error::{Result, SimError};
use crate::sim::extract::ReferenceTable;

pub enum FastaWriter {
    Plain(BufWriter<File>),
    Compressed(BufWriter<GzEncoder<File>>),
}

/// Open a FASTA file for reading, handles gzipped files automatically
pub fn open_fasta(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path)
        .map_err(|e| SimError::config(format!("cannot open reference {}: {}", path.display(), e)))?;
    if path.extension().map_or(false, |ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Record name: the id, then each description word, joined by `-`.
fn record_name(record: &fasta::Record) -> String {
    let mut name = record.id().to_string();
    if let Some(desc) = record.desc() {
        for word in desc.split_whitespace() {
            name.push('-');
            name.push_str(word);
        }
    }
    name
}

/// Read every record of a (possibly gzipped) FASTA file, in file order, upper-cased.
pub fn read_reference<R: BufRead>(reader: R) -> Result<ReferenceTable> {
    let mut records = Vec::new();
    for record in fasta::Reader::from_bufread(reader).records() {
        let record = record?;
        records.push((record_name(&record), record.seq().to_ascii_uppercase()));
    }
    Ok(ReferenceTable::from_records(records))
}

pub fn load_reference(path: &Path) -> Result<ReferenceTable> {
    info!("Reading reference genome {}", path.display());
    let table = read_reference(open_fasta(path)?)?;
    info!(
        "Loaded {} sequences, {} bases",
        table.len(),
        table.total_len()
    );
    Ok(table)
}

impl FastaWriter {
    /// Gzip output when the path ends in `.gz`
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        if path.extension().map_or(false, |ext| ext == "gz") {
            let encoder = GzEncoder::new(file, Compression::default());
            Ok(FastaWriter::Compressed(BufWriter::new(encoder)))
        } else {
            Ok(FastaWriter::Plain(BufWriter::new(file)))
        }
    }

    pub fn write_record(&mut self, header: &str, sequence: &[u8]) -> io::Result<()> {
        match self {
            FastaWriter::Plain(writer) => {
                writeln!(writer, ">{}", header)?;
                writer.write_all(sequence)?;
                writer.write_all(b"\n")?;
            }
            FastaWriter::Compressed(writer) => {
                writeln!(writer, ">{}", header)?;
                writer.write_all(sequence)?;
                writer.write_all(b"\n")?;
            }
        };
        Ok(())
    }

    /// Flush buffers and write the gzip trailer.
    pub fn finish(self) -> io::Result<()> {
        match self {
            FastaWriter::Plain(mut writer) => writer.flush(),
            FastaWriter::Compressed(writer) => {
                let encoder = writer.into_inner().map_err(|e| e.into_error())?;
                encoder.finish()?;
                Ok(())
            }
        }
    }
}
