use clap::{Args, Parser, Subcommand};
use longsim::config::{AddressingMode, Chemistry, ClassWeights, ProfileSource, SimConfig};
use longsim::sim::OutputOptions;

#[derive(Parser, Debug)]
#[command(name = "longsim", version, about = "Nanopore read simulator driven by empirical error profiles", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simulate reads from a single circular genome
    Circular(SimulateArgs),

    /// Simulate reads from one or more linear sequences
    Linear(SimulateArgs),
}

impl Commands {
    pub fn mode(&self) -> AddressingMode {
        match self {
            Commands::Circular(_) => AddressingMode::Circular,
            Commands::Linear(_) => AddressingMode::Linear,
        }
    }

    pub fn args(&self) -> &SimulateArgs {
        match self {
            Commands::Circular(args) | Commands::Linear(args) => args,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Reference genome FASTA(.gz)
    #[arg(short, long)]
    pub reference: String,

    /// Flowcell chemistry selecting the profile set (R7 or R7.3)
    #[arg(short, long, default_value = "R7")]
    pub chemistry: Chemistry,

    /// Output prefix
    #[arg(short, long, default_value = "simulated")]
    pub output: String,

    /// Number of reads to simulate
    #[arg(short, long, default_value_t = 24221)]
    pub number: usize,

    /// Model profile replacing <chemistry>_model_profile
    #[arg(short = 'p', long)]
    pub model_profile: Option<String>,

    /// Directory holding the profile files
    #[arg(long, default_value = ".")]
    pub profile_dir: String,

    /// Insertion length weight
    #[arg(short, long, default_value_t = 1.0)]
    pub ins_weight: f64,

    /// Deletion length weight
    #[arg(short, long, default_value_t = 1.0)]
    pub del_weight: f64,

    /// Mismatch length weight
    #[arg(short, long, default_value_t = 1.0)]
    pub mis_weight: f64,

    /// Simulate error-free reads
    #[arg(long)]
    pub perfect: bool,

    /// Avoid and compress homopolymer runs of 6 or more
    #[arg(long)]
    pub kmer_bias: bool,

    /// Seed for the random generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Gzip the reads file
    #[arg(long)]
    pub compress: bool,

    /// Enable debug logging
    #[arg(long)]
    pub verbose: bool,
}

impl SimulateArgs {
    pub fn sim_config(&self, mode: AddressingMode) -> SimConfig {
        SimConfig {
            mode,
            weights: ClassWeights {
                mismatch: self.mis_weight,
                insertion: self.ins_weight,
                deletion: self.del_weight,
            },
            perfect: self.perfect,
            homopolymer_bias: self.kmer_bias,
            seed: self.seed,
            ..SimConfig::default()
        }
    }

    pub fn profile_source(&self) -> ProfileSource {
        let mut source = ProfileSource::new(&self.profile_dir, self.chemistry);
        source.model_profile = self.model_profile.as_ref().map(Into::into);
        source
    }

    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            prefix: self.output.clone(),
            compress: self.compress,
        }
    }
}
