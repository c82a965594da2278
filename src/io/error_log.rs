// src/io/error_log.rs
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::sim::mutate::ErrorRecord;

pub const ERROR_LOG_HEADER: &str = "Seq_name\tSeq_pos\terror_type\terror_length\tref_base\tseq_base";

/// Tab-separated ground-truth log of applied errors
pub struct ErrorLog<W: Write> {
    writer: W,
    rows: usize,
}

impl ErrorLog<BufWriter<File>> {
    pub fn create(path: &Path) -> io::Result<Self> {
        ErrorLog::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> ErrorLog<W> {
    /// Writes the header line immediately
    pub fn new(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "{}", ERROR_LOG_HEADER)?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn write(&mut self, record: &ErrorRecord) -> io::Result<()> {
        writeln!(
            self.writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            record.read_name,
            record.position,
            record.class.tag(),
            record.length,
            record.ref_bases,
            record.read_bases
        )?;
        self.rows += 1;
        Ok(())
    }

    pub fn write_all(&mut self, records: &[ErrorRecord]) -> io::Result<()> {
        for record in records {
            self.write(record)?;
        }
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::markov::ErrorClass;

    #[test]
    fn test_rows_follow_header() {
        let mut log = ErrorLog::new(Vec::new()).unwrap();
        log.write(&ErrorRecord {
            read_name: "chr1_17".to_string(),
            position: 50,
            class: ErrorClass::Mismatch,
            length: 3,
            ref_bases: "ACG".to_string(),
            read_bases: "TTA".to_string(),
        })
        .unwrap();
        assert_eq!(log.rows(), 1);
        let text = String::from_utf8(log.finish().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ERROR_LOG_HEADER);
        assert_eq!(lines[1], "chr1_17\t50\tmis\t3\tACG\tTTA");
    }
}
