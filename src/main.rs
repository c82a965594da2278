mod cli_main;

use clap::Parser;
use cli_main::Cli;
use longsim::sim::run_simulation;
use std::path::Path;
use std::process;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

fn main() {
    let cli = Cli::parse();
    let mode = cli.command.mode();
    let args = cli.command.args();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Setting tracing default failed: {}", e);
    }

    info!("Simulating {} reads in {:?} mode", args.number, mode);
    let result = run_simulation(
        Path::new(&args.reference),
        &args.profile_source(),
        args.number,
        args.sim_config(mode),
        &args.output_options(),
    );

    match result {
        Ok(summary) => info!(
            "Wrote {} unaligned and {} aligned reads to {}",
            summary.unaligned_reads,
            summary.aligned_reads,
            args.output_options().reads_path().display()
        ),
        Err(e) => {
            eprintln!("Error during simulation: {}", e);
            process::exit(1);
        }
    }
}
