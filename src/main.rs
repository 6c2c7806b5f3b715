//! checkpoint-trim: command-line driver for the schedule search.
//!
//! Reads a cache state in `x`/` ` notation, trims it to fit a memory budget
//! and reports the resulting recompute schedule.

use clap::Parser;
use serde::Serialize;
use tracing::info;

use checkpoint_trim::config::{Cli, Command, Config, ReportConfig, SearchConfig};
use checkpoint_trim::schedule::ruler::{self, RulerSchedule};
use checkpoint_trim::schedule::{CacheState, SweepStep, TrimError, Trimmer};

/// Result of an `optimize` run.
#[derive(Debug, Serialize)]
struct OptimizeReport {
    budget: u32,
    input: String,
    output: String,
    resident: u32,
    cost: u64,
    steps: Vec<SweepStep>,
}

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Initialize tracing/logging.
    let filter = if cli.verbose {
        "checkpoint_trim=debug"
    } else {
        "checkpoint_trim=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("checkpoint-trim v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration.
    let config = Config::load(&cli.config)?;

    info!(
        policy = ?config.search.policy,
        max_candidates = ?config.search.max_candidates,
        "Configuration loaded"
    );

    let trimmer = Trimmer::new(config.search.clone());

    match cli.command {
        Command::Optimize { state, budget } => {
            let state: CacheState = state.parse()?;
            run_optimize(&trimmer, &config.report, budget, state)
        }
        Command::Cost { state, budget } => {
            let state: CacheState = state.parse()?;
            let cost = trimmer.sweep_cost(budget, state)?;
            println!("{cost}");
            Ok(())
        }
        Command::Ruler {
            steps,
            max_candidates,
        } => {
            let capped = Trimmer::new(SearchConfig {
                max_candidates: config.search.max_candidates.or(Some(max_candidates)),
                ..config.search.clone()
            });
            run_ruler(&capped, steps);
            Ok(())
        }
    }
}

fn run_optimize(
    trimmer: &Trimmer,
    report: &ReportConfig,
    budget: u32,
    state: CacheState,
) -> anyhow::Result<()> {
    let trimmed = trimmer.optimize(budget, state)?;
    let steps = trimmer.sweep_trace(budget, trimmed)?;
    let cost = steps.iter().map(SweepStep::cost).sum();

    let result = OptimizeReport {
        budget,
        input: state.to_string(),
        output: trimmed.to_string(),
        resident: trimmed.resident_count(),
        cost,
        steps: if report.show_steps { steps } else { Vec::new() },
    };

    if report.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("input    [{}]", result.input);
    println!("output   [{}]", result.output);
    println!("resident {} / {}", result.resident, budget);
    println!("cost     {}", result.cost);

    for step in &result.steps {
        match step {
            SweepStep::Advance { state } => println!("  [{state}]"),
            SweepStep::Recompute { cost, before, after } => {
                println!("  [{before}] -> [{after}] recompute {cost}")
            }
        }
    }
    Ok(())
}

fn run_ruler(trimmer: &Trimmer, steps: usize) {
    if let Some(limit) = trimmer.config().max_candidates {
        info!(limit, "Candidate cap per search");
    }
    println!("{:<64} {:>10} {:>10}", "ctz ruler (oldest first)", "ctz", "optimal");
    for state in RulerSchedule::new().take(steps) {
        let row = ruler::compare(trimmer, state);
        // The diagram reads oldest-first, so print position 0 last.
        let diagram: String = state.to_string().chars().rev().collect();
        println!(
            "{diagram:<64} {:>10} {:>10}",
            describe(&row.ruler_cost),
            describe(&row.optimal_cost)
        );
    }
}

fn describe(cost: &Result<u64, TrimError>) -> String {
    match cost {
        Ok(cost) => cost.to_string(),
        Err(TrimError::Infeasible { .. }) => "infeasible".to_string(),
        Err(TrimError::SearchTruncated { .. }) => "truncated".to_string(),
    }
}
