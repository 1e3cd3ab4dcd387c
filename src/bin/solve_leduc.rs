//! Leduc Hold'em CFR+ solver binary.
//!
//! Usage:
//!   cargo run --release --bin solve_leduc -- [OPTIONS]
//!
//! Examples:
//!   solve_leduc --iterations 20000 --eval-every 2000
//!   solve_leduc --vanilla --simultaneous --output leduc.json
//!   solve_leduc --sample 16 --seed 7 --parallel
//!   solve_leduc --evaluate leduc.json --best-response
//!
//! With `--output FILE` the strategy report (including exploitability
//! checkpoints) goes to FILE and both best responses go next to it as
//! `<stem>.br.json`.
//!
//! Set `RUST_LOG=debug` to see best-response rounds.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use leduc_solver::cfr::{
    Averaging, BestResponse, CFRConfig, CFRSolver, Exploitability, StrategyProfile,
};
use leduc_solver::games::leduc::{BestResponseReport, StrategyReport};

#[derive(Parser)]
#[command(name = "solve_leduc")]
#[command(about = "Solve Leduc Hold'em with CFR+ and measure exploitability")]
struct Cli {
    /// Training iterations
    #[arg(short, long, default_value_t = 10_000)]
    iterations: u64,

    /// Measure exploitability every N iterations (0 = only at the end)
    #[arg(long, default_value_t = 1_000)]
    eval_every: u64,

    /// Sample N deals per pass instead of enumerating all 24
    #[arg(long)]
    sample: Option<usize>,

    /// Update both players in a single pass
    #[arg(long)]
    simultaneous: bool,

    /// Vanilla CFR: no regret flooring, uniform averaging
    #[arg(long)]
    vanilla: bool,

    /// Skip the first N iterations in the linear average
    #[arg(long)]
    delay: Option<u64>,

    /// Traverse deals in parallel
    #[arg(long)]
    parallel: bool,

    /// Random seed for deal sampling
    #[arg(short, long)]
    seed: Option<u64>,

    /// Base configuration JSON; other flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the strategy report as JSON (the best-response report with --evaluate)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print both best-response strategies at the end
    #[arg(long)]
    best_response: bool,

    /// Score a saved strategy report instead of training
    #[arg(long, value_name = "FILE")]
    evaluate: Option<PathBuf>,
}

impl Cli {
    fn solver_config(&self) -> leduc_solver::Result<CFRConfig> {
        let mut config = match &self.config {
            Some(path) => {
                println!("Loading configuration from: {}", path.display());
                CFRConfig::from_json_file(path)?
            }
            None => CFRConfig::default(),
        };

        if self.vanilla {
            config = config
                .with_cfr_plus(false)
                .with_averaging(Averaging::Uniform);
        }
        if let Some(delay) = self.delay {
            config = config.with_averaging(Averaging::Linear { delay });
        }
        if let Some(per_pass) = self.sample {
            config = config.with_sampling(per_pass);
        }
        if self.simultaneous {
            config = config.with_alternating(false);
        }
        if self.parallel {
            config = config.with_parallel(true);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.solver_config()?;

    if let Some(path) = &cli.evaluate {
        evaluate(&cli, &config, path)?;
        return Ok(());
    }

    println!("=================================================");
    println!("  Leduc Hold'em CFR Solver");
    println!("=================================================");
    println!();
    println!("Regret flooring: {}", if config.use_cfr_plus { "CFR+" } else { "none" });
    println!("Updates: {}", if config.alternating { "alternating" } else { "simultaneous" });
    println!("Averaging: {:?}", config.averaging);
    println!("Deals: {:?}", config.deals);
    println!("Iterations: {}", cli.iterations);
    println!();

    let mut solver = CFRSolver::new(config);

    let pb = ProgressBar::new(cli.iterations);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(concat!(
                "{spinner:.green} Training [{bar:40.cyan/blue}] ",
                "{pos}/{len} ({per_sec}, {eta}) {msg}"
            ))?
            .progress_chars("#>-"),
    );

    let chunk = if cli.eval_every == 0 {
        cli.iterations
    } else {
        cli.eval_every
    };
    let tick = (chunk / 100).max(1);

    while solver.iteration() < cli.iterations {
        let n = chunk.min(cli.iterations - solver.iteration());
        solver.train_with_callback(n, tick, |stats| pb.set_position(stats.iterations));
        pb.set_position(solver.iteration());

        if cli.eval_every > 0 && solver.iteration() < cli.iterations {
            let e = pb.suspend(|| solver.exploitability())?;
            pb.set_message(format!("{:.3} mbb/hand", e.mbb_per_hand()));
        }
    }
    pb.finish_and_clear();

    let stats = solver.stats();
    info!(
        "trained {} iterations in {:.2}s ({:.0} it/s)",
        stats.iterations, stats.elapsed_seconds, stats.iterations_per_second
    );

    let (exploitability, responses) = solver.measure()?;

    let profile = solver.average_strategy();
    let report = StrategyReport::new(&profile, Some(exploitability), solver.iteration())
        .with_history(&solver.stats().exploitability_history);
    let br_report = BestResponseReport::new(&responses);
    println!();
    report.print_summary();

    if cli.best_response {
        println!();
        br_report.print_summary();
    }

    if let Some(path) = &cli.output {
        let br_path = best_response_path(path);
        report.save_json(path)?;
        br_report.save_json(&br_path)?;
        println!();
        println!("Results saved to {}", path.display());
        println!("Best responses saved to {}", br_path.display());
    }

    Ok(())
}

/// Best responses for both seats against a saved strategy.
fn evaluate(cli: &Cli, config: &CFRConfig, path: &Path) -> leduc_solver::Result<()> {
    println!("Evaluating strategy from: {}", path.display());
    let profile = StrategyProfile::from_json_file(path)?;

    let responses = BestResponse::for_both_seats(&profile, config.best_response_rounds)?;
    let exploitability = Exploitability::from_responses(&responses);
    let report = BestResponseReport::new(&responses);

    println!();
    println!("Best response p0: {:.6} chips/hand", exploitability.values[0]);
    println!("Best response p1: {:.6} chips/hand", exploitability.values[1]);
    println!(
        "Exploitability: {:.6} chips/hand ({:.3} mbb/hand)",
        exploitability.total(),
        exploitability.mbb_per_hand()
    );

    if cli.best_response {
        println!();
        report.print_summary();
    }

    if let Some(out) = &cli.output {
        report.save_json(out)?;
        println!();
        println!("Best responses saved to {}", out.display());
    }

    Ok(())
}

/// `leduc.json` -> `leduc.br.json`, next to the strategy report.
fn best_response_path(output: &Path) -> PathBuf {
    output.with_extension("br.json")
}
