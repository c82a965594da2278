pub mod error_log;
pub mod fasta;
pub mod profile;
pub mod report;
