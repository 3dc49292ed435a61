//! icm CLI - Command-line interface for the ICM engine
//!
//! Prints each player's expected payout for a field of stacks, and provides
//! a throughput harness for the evaluator.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use icm_engine::evaluator::benchmark_throughput;
use icm_engine::placement::{cumulative, finish_distribution_capped};
use icm_engine::{IcmEvaluator, DEFAULT_MAX_PLAYERS};

#[derive(Parser)]
#[command(author, version, about = "Independent Chip Model payout calculator", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    eval: EvalArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Expected payout per player (default when no subcommand is given)
    Eval(EvalArgs),
    /// Time repeated evaluations of a synthetic field
    Bench(BenchArgs),
}

#[derive(Args)]
struct EvalArgs {
    /// Chip stacks, comma separated
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true,
          default_values_t = [7000.0, 20000.0, 8000.0])]
    stacks: Vec<f64>,

    /// Prize per finishing place, best first, comma separated
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true,
          default_values_t = [50.0, 30.0, 20.0])]
    payouts: Vec<f64>,

    /// Fill the table on all cores
    #[arg(long)]
    parallel: bool,

    /// Also print each player's finish-position probabilities
    #[arg(long)]
    placements: bool,

    /// Refuse fields larger than this (never above 18)
    #[arg(long, default_value_t = DEFAULT_MAX_PLAYERS)]
    max_players: usize,
}

#[derive(Args)]
struct BenchArgs {
    /// Players in the synthetic field
    #[arg(long, default_value_t = 10)]
    players: usize,

    /// Timed evaluations
    #[arg(long, default_value_t = 100)]
    iterations: usize,

    /// Fill the table on all cores
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Eval(args)) => run_eval(args),
        Some(Command::Bench(args)) => run_bench(args),
        None => run_eval(cli.eval),
    }
}

fn run_eval(args: EvalArgs) -> Result<()> {
    let evaluator = IcmEvaluator::new()
        .max_players(args.max_players)
        .parallel(args.parallel);
    log::info!(
        "evaluating {} players (cap: {}, parallel: {})",
        args.stacks.len(),
        evaluator.player_limit(),
        evaluator.is_parallel()
    );

    let ev = evaluator
        .evaluate(&args.stacks, &args.payouts)
        .context("ICM evaluation failed")?;
    for (i, value) in ev.iter().enumerate() {
        println!("Player{} Payout after ICM: {:.2}", i + 1, value);
    }

    if args.placements {
        let dist = finish_distribution_capped(&args.stacks, args.max_players)
            .context("finish distribution failed")?;
        // Paid places are the leading non-zero payouts
        let paid = args.payouts.iter().take_while(|&&p| p > 0.0).count();
        let itm = if paid > 0 { Some(cumulative(&dist, paid - 1)) } else { None };

        println!();
        for (i, row) in dist.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|p| format!("{:6.2}%", p * 100.0)).collect();
            match &itm {
                Some(itm) => println!(
                    "Player{} finishes: {}  in the money: {:6.2}%",
                    i + 1,
                    cells.join(" "),
                    itm[i] * 100.0
                ),
                None => println!("Player{} finishes: {}", i + 1, cells.join(" ")),
            }
        }
    }
    Ok(())
}

fn run_bench(args: BenchArgs) -> Result<()> {
    println!("Running ICM evaluator benchmark...");
    println!("Field: {} players, {} iterations", args.players, args.iterations);

    let evaluator = IcmEvaluator::new().parallel(args.parallel);
    let (evals_per_sec, duration_ms) = benchmark_throughput(&evaluator, args.players, args.iterations)
        .context("benchmark field rejected")?;

    println!("Results:");
    println!("  Duration: {} ms", duration_ms);
    println!("  Throughput: {:.2} evals/sec", evals_per_sec);
    Ok(())
}
