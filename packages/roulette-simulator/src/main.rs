//! Roulette simulator CLI - plays complete elimination runs in memory and
//! records how they ended.

mod output;
mod simulator;
mod types;

use std::time::Instant;

use clap::Parser;
use output::OutputWriter;
use simulator::Simulator;
use tracing::{info, warn};
use types::RunResult;

#[derive(Parser)]
#[command(name = "roulette-simulator")]
#[command(about = "Simulate elimination roulette runs against an in-memory session")]
struct Args {
    /// Number of runs to simulate
    #[arg(short, long, default_value = "1")]
    runs: u32,

    /// Participants per session
    #[arg(short, long, default_value = "5", value_parser = clap::value_parser!(u8).range(1..=5))]
    participants: u8,

    /// Base seed; every run derives its own seed from it
    #[arg(long)]
    seed: Option<u64>,

    /// Stop a run after this many rounds even if nobody is eliminated
    #[arg(long, default_value = "100")]
    max_rounds: u32,

    /// Probability that a round is a WIN
    #[arg(long, default_value = "0.5")]
    win_rate: f64,

    /// Output directory for results
    #[arg(long, default_value = "./simulation-results")]
    output: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    roulette::telemetry::init_tracing_with_default(if args.verbose { "debug" } else { "warn" });

    if !(0.0..=1.0).contains(&args.win_rate) {
        return Err(format!("--win-rate must be within 0..=1, got {}", args.win_rate).into());
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        runs = args.runs,
        participants = args.participants,
        seed,
        "Starting roulette simulator"
    );

    let mut output_writer = OutputWriter::new(&args.output)?;
    let mut simulator = Simulator::new(
        usize::from(args.participants),
        args.max_rounds,
        args.win_rate,
        seed,
    );

    let start = Instant::now();
    let mut results = Vec::new();
    let mut errors = 0;

    for run in 1..=args.runs {
        match simulator.simulate_run(run).await {
            Ok(result) => {
                if let Err(e) = output_writer.write_run(&result) {
                    warn!("Failed to write result for run {}: {}", run, e);
                }
                info!(run, rounds = result.rounds, reset = result.reset, "Run completed");
                results.push(result);
            }
            Err(e) => {
                errors += 1;
                warn!(run, code = %e.code(), "Run failed: {}", e);
            }
        }
    }

    let path = output_writer.finish()?;
    print_summary(&results, errors, start.elapsed(), args.runs);
    println!("Results written to: {}", path.display());

    Ok(())
}

fn print_summary(results: &[RunResult], errors: u32, elapsed: std::time::Duration, total: u32) {
    println!("\n=== Simulation Summary ===");
    println!("Runs completed: {}/{}", results.len(), total);
    if errors > 0 {
        println!("Errors: {}", errors);
    }
    println!("Total time: {:?}", elapsed);

    if results.is_empty() {
        return;
    }

    let n = results.len() as f64;
    let resets = results.iter().filter(|r| r.reset).count();
    let rounds: u32 = results.iter().map(|r| r.rounds).sum();
    let wins: u32 = results.iter().map(|r| r.wins).sum();
    let losses: u32 = results.iter().map(|r| r.losses).sum();
    let longest = results.iter().map(|r| r.rounds).max().unwrap_or(0);

    println!("Runs ending in elimination: {} ({:.1}%)", resets, resets as f64 / n * 100.0);
    println!("Average rounds per run: {:.1} (longest {})", f64::from(rounds) / n, longest);
    println!("Rounds won/lost: {}/{}", wins, losses);
}
