//! Honeycomb audit simulation CLI.
//!
//! Drives a reputation-staked audit run against the in-memory ledger and
//! prints the end-of-run report.

use clap::Parser;
use honeycomb_ledger::LedgerAddr;
use honeycomb_sim::{RunReport, SimConfig, SimLedger, SimulationRunner, Standing};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Honeycomb reputation-staked audit simulator
#[derive(Parser, Debug)]
#[command(name = "honeycomb-sim")]
#[command(about = "Run the Honeycomb reputation-staked audit simulation", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = derive from wall clock)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of audit rounds
    #[arg(short, long, default_value = "10")]
    rounds: u64,

    /// Honest validators to register
    #[arg(long, default_value = "3")]
    honest: usize,

    /// Lazy validators to register
    #[arg(long, default_value = "2")]
    lazy: usize,

    /// Per-round trapdoor probability
    #[arg(short = 'p', long, default_value = "0.3")]
    trapdoor_prob: f64,

    /// Reputation staked per validator
    #[arg(long, default_value = "100")]
    stake: u128,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if !(0.0..=1.0).contains(&args.trapdoor_prob) {
        eprintln!("Error: --trapdoor-prob must be within [0.0, 1.0]");
        std::process::exit(1);
    }

    let seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system clock before epoch")
            .as_nanos() as u64
    } else {
        args.seed
    };

    let config = SimConfig {
        seed,
        rounds: args.rounds,
        honest: args.honest,
        lazy: args.lazy,
        trapdoor_probability: args.trapdoor_prob,
        stake_amount: args.stake,
    };

    if !args.json {
        info!("Honeycomb Audit Simulator v0.1.0");
        info!(
            "seed={} rounds={} honest={} lazy={} trapdoor_prob={}",
            config.seed, config.rounds, config.honest, config.lazy, config.trapdoor_probability
        );
    }

    let authority = LedgerAddr::from_seed(0);
    let ledger = SimLedger::new(authority);

    let runner = match SimulationRunner::setup(config, ledger, authority).await {
        Ok(runner) => runner,
        Err(e) => {
            error!("setup failed: {}", e);
            std::process::exit(1);
        }
    };

    let report = runner.run().await;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("report serializes")
        );
    } else {
        print_summary(&report);
    }

    // Exit with proper code for CI
    if report.failure.is_some() {
        std::process::exit(1);
    }
}

fn print_summary(report: &RunReport) {
    info!("--- simulation summary ---");
    info!(
        "rounds completed: {} | trapdoor receipts: {}",
        report.rounds_completed, report.trapdoor_receipts
    );
    info!(
        "votes: {} accepted, {} rejected (slash), {} rejected (other)",
        report.votes_accepted, report.votes_rejected_slash, report.votes_rejected_other
    );
    for validator in &report.validators {
        let status = match validator.standing {
            Standing::Active => "ACTIVE",
            Standing::Slashed => "SLASHED",
        };
        info!(
            "  {} validator {}: {}",
            validator.policy, validator.addr, status
        );
    }
    if let Some(reason) = &report.failure {
        error!("run aborted: {}", reason);
    }
}
