mod common;

use std::fs;

use common::{write_profiles, write_reference};
use longsim::config::{AddressingMode, Chemistry, ProfileSource, SimConfig};
use longsim::error::SimError;
use longsim::sim::{run_simulation, OutputOptions};
use tempfile::tempdir;

fn headers(path: &std::path::Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| l.starts_with('>'))
        .map(str::to_string)
        .collect()
}

#[test]
fn test_linear_run_writes_every_output() {
    let dir = tempdir().unwrap();
    write_profiles(dir.path());
    let reference = dir.path().join("genome.fa");
    write_reference(&reference, &["chr1", "chr2 plasmid"], 3000, 5);

    let prefix = dir.path().join("run").display().to_string();
    let output = OutputOptions::new(prefix.clone());
    let config = SimConfig {
        mode: AddressingMode::Linear,
        seed: Some(17),
        ..SimConfig::default()
    };
    let source = ProfileSource::new(dir.path(), Chemistry::R7);
    let summary = run_simulation(&reference, &source, 20, config, &output).unwrap();

    // 3:1 aligned to unaligned
    assert_eq!(summary.aligned_reads, 15);
    assert_eq!(summary.unaligned_reads, 5);
    assert_eq!(summary.seed, 17);

    let headers = headers(&output.reads_path());
    assert_eq!(headers.len(), 20);
    for header in &headers {
        assert!(header.starts_with(">chr1_") || header.starts_with(">chr2-plasmid_"));
    }
    assert!(headers[4].ends_with("-4"));
    assert!(headers[5].ends_with("-0"));
    // aligned: >origin_head_middle_tail-index
    let aligned_fields: Vec<&str> = headers[5].trim_start_matches('>').split('_').collect();
    assert_eq!(aligned_fields.len(), 5);

    let log = fs::read_to_string(output.error_log_path()).unwrap();
    let logged = summary.errors.mismatch + summary.errors.insertion + summary.errors.deletion;
    assert_eq!(log.lines().count(), logged + 1);
    assert!(logged > 0);

    for side in ["head", "middle", "tail", "aligned", "ht", "ratio", "middle_ref"] {
        let text = fs::read_to_string(format!("{}_{}", prefix, side)).unwrap();
        assert_eq!(text.lines().count(), 15, "side file {}", side);
    }

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output.summary_path()).unwrap()).unwrap();
    assert_eq!(json["aligned_reads"], 15);
    assert_eq!(json["chemistry"], "R7");
}

#[test]
fn test_same_seed_same_reads() {
    let dir = tempdir().unwrap();
    write_profiles(dir.path());
    let reference = dir.path().join("genome.fa");
    write_reference(&reference, &["chr1"], 4000, 8);
    let source = ProfileSource::new(dir.path(), Chemistry::R7);

    let mut outputs = Vec::new();
    for run in ["a", "b"] {
        let output = OutputOptions::new(dir.path().join(run).display().to_string());
        let config = SimConfig {
            seed: Some(2024),
            ..SimConfig::default()
        };
        run_simulation(&reference, &source, 8, config, &output).unwrap();
        outputs.push(fs::read_to_string(output.reads_path()).unwrap());
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn test_perfect_circular_run() {
    let dir = tempdir().unwrap();
    write_profiles(dir.path());
    let reference = dir.path().join("plasmid.fa");
    write_reference(&reference, &["plasmid"], 2000, 3);

    let prefix = dir.path().join("perfect").display().to_string();
    let output = OutputOptions {
        prefix: prefix.clone(),
        compress: true,
    };
    let config = SimConfig {
        mode: AddressingMode::Circular,
        perfect: true,
        seed: Some(1),
        ..SimConfig::default()
    };
    let source = ProfileSource::new(dir.path(), Chemistry::R7);
    let summary = run_simulation(&reference, &source, 6, config, &output).unwrap();
    assert_eq!((summary.aligned_reads, summary.unaligned_reads), (6, 0));
    assert_eq!(summary.errors.mismatch + summary.errors.insertion + summary.errors.deletion, 0);
    assert!(output.reads_path().to_string_lossy().ends_with(".fasta.gz"));

    let reads = longsim::io::fasta::load_reference(&output.reads_path()).unwrap();
    assert_eq!(reads.len(), 6);
    assert!(!std::path::Path::new(&format!("{}_head", prefix)).exists());
}

#[test]
fn test_circular_rejects_multi_sequence_reference() {
    let dir = tempdir().unwrap();
    write_profiles(dir.path());
    let reference = dir.path().join("genome.fa");
    write_reference(&reference, &["chr1", "chr2"], 500, 5);
    let output = OutputOptions::new(dir.path().join("bad").display().to_string());
    let config = SimConfig {
        mode: AddressingMode::Circular,
        ..SimConfig::default()
    };
    let source = ProfileSource::new(dir.path(), Chemistry::R7);
    let err = run_simulation(&reference, &source, 5, config, &output).unwrap_err();
    assert!(matches!(err, SimError::Configuration(_)));
    assert!(!output.reads_path().exists());
}

#[test]
fn test_missing_profile_is_fatal() {
    let dir = tempdir().unwrap();
    write_profiles(dir.path());
    fs::remove_file(dir.path().join("R7_ht_ratio")).unwrap();
    let reference = dir.path().join("genome.fa");
    write_reference(&reference, &["chr1"], 500, 5);
    let output = OutputOptions::new(dir.path().join("bad").display().to_string());
    let source = ProfileSource::new(dir.path(), Chemistry::R7);
    let err = run_simulation(&reference, &source, 5, SimConfig::default(), &output).unwrap_err();
    assert!(matches!(err, SimError::Configuration(_)));
}
