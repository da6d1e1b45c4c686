//! NanoVanity CLI
//!
//! Finds a Nano seed whose first account address contains a chosen string.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use clap::Parser;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use nanovanity_core::{
    format_difficulty, format_duration, Chain, DerivedAccount, Estimate, EstimateModel,
    MatchResult, Position, SearchConfig, SearchCoordinator, SearchEvent, VanitySpec,
    DEFAULT_MS_PER_CHECK, MAX_PATTERN_LEN, NANO, XRB,
};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "nanovanity")]
#[command(author = "NanoVanity Team")]
#[command(version)]
#[command(about = "Find a Nano seed whose address contains a vanity string", long_about = None)]
struct Cli {
    /// The vanity string you want your address to have
    pattern: String,

    /// Search for the vanity string as a prefix of the address (default)
    #[arg(short, long, conflicts_with_all = ["suffix", "contains"])]
    prefix: bool,

    /// Search for the vanity string as a suffix of the address
    #[arg(short, long, conflicts_with = "contains")]
    suffix: bool,

    /// Search for the vanity string anywhere in the address
    #[arg(short, long)]
    contains: bool,

    /// Use all available cores (default leaves one free)
    #[arg(short, long = "aggressive-cpu", conflicts_with = "half_cpu")]
    aggressive_cpu: bool,

    /// Only use half of the available cores
    #[arg(short = 'b', long = "half-cpu")]
    half_cpu: bool,

    /// Exact number of worker threads (overrides -a/-b)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Derive legacy xrb_ addresses instead of nano_
    #[arg(long)]
    legacy_prefix: bool,

    /// Seconds to measure throughput before printing time estimates
    #[arg(long, default_value = "20")]
    estimate_after: u64,

    /// Estimate "contains" searches with the legacy single-offset formula
    #[arg(long)]
    legacy_estimate: bool,

    /// How many crashed workers may be replaced
    #[arg(long, default_value = "0")]
    max_respawns: usize,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn position(&self) -> Position {
        if self.suffix {
            Position::Suffix
        } else if self.contains {
            Position::Anywhere
        } else {
            Position::Prefix
        }
    }

    fn estimate_model(&self) -> EstimateModel {
        if self.legacy_estimate {
            EstimateModel::Legacy
        } else {
            EstimateModel::Corrected
        }
    }
}

/// Workers to run given the CPU count and flags
fn worker_count(cpus: usize, aggressive: bool, half: bool, explicit: Option<usize>) -> usize {
    if let Some(n) = explicit.filter(|&n| n > 0) {
        return n;
    }
    let cpus = cpus.max(1);
    if aggressive {
        cpus
    } else if half {
        if cpus > 1 { cpus / 2 } else { cpus }
    } else if cpus > 1 {
        cpus - 1
    } else {
        cpus
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let started = Instant::now();

    let chain: Arc<dyn Chain> = if cli.legacy_prefix {
        Arc::new(XRB)
    } else {
        Arc::new(NANO)
    };

    let spec = VanitySpec::new(cli.pattern.to_lowercase(), cli.position())
        .normalize()
        .map_err(|e| {
            anyhow!(
                "{e}. The vanity string must consist of the characters {} and be at most {} characters long",
                chain.valid_address_chars(),
                MAX_PATTERN_LEN
            )
        })?;
    let workers = worker_count(num_cpus::get(), cli.aggressive_cpu, cli.half_cpu, cli.workers);
    let estimate = Estimate::new(spec.len(), spec.position, cli.estimate_model());

    if !cli.json {
        eprintln!(
            "Searching for vanity seed that creates an address {} '{}', with {} processors.",
            spec.position.describe(),
            spec.pattern,
            workers
        );
        eprintln!(
            "Difficulty: {} trials for a 50% chance",
            format_difficulty(estimate.expected_trials(0.5))
        );
        eprintln!("Generating time estimate for finding seed...");
    }

    let config = SearchConfig {
        max_respawns: cli.max_respawns,
        ..Default::default()
    };
    let coordinator = SearchCoordinator::new(chain, config);
    let events = coordinator.subscribe();
    let print_after = Duration::from_secs(cli.estimate_after);
    let quiet = cli.json;
    thread::Builder::new()
        .name("nanovanity-estimates".into())
        .spawn(move || watch_events(events, estimate, workers, print_after, quiet))?;

    let result = coordinator.start(spec, workers).await?;

    if cli.json {
        let account = coordinator.chain().derive_account(&result.seed);
        println!("{}", serde_json::to_string_pretty(&json_report(&result, &account))?);
    } else {
        print_result(&result, started.elapsed());
    }

    Ok(())
}

/// Track throughput and print the estimates once `print_after` has passed
fn watch_events(
    events: Receiver<SearchEvent>,
    estimate: Estimate,
    workers: usize,
    print_after: Duration,
    quiet: bool,
) {
    let deadline = Instant::now() + print_after;
    let mut ms_per_check = DEFAULT_MS_PER_CHECK;
    let mut printed = false;

    loop {
        let wait = if printed {
            Duration::from_secs(3600)
        } else {
            deadline.saturating_duration_since(Instant::now())
        };

        match events.recv_timeout(wait) {
            Ok(SearchEvent::Throughput(sample)) if sample.checks > 0 => {
                ms_per_check = sample.per_worker_ms_per_check(workers);
            }
            Ok(SearchEvent::WorkerDied { worker_id }) => warn!(worker = worker_id, "worker died"),
            Ok(SearchEvent::Resolved { .. }) => return,
            Ok(_) => {}
            Err(RecvTimeoutError::Timeout) => {
                if !printed && !quiet {
                    print_estimates(&estimate, workers, ms_per_check);
                }
                printed = true;
            }
            Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

fn print_estimates(estimate: &Estimate, workers: usize, ms_per_check: f64) {
    eprintln!("Estimated times for finding a seed:");
    for confidence in [0.5, 0.95] {
        let ms = estimate.eta_milliseconds(confidence, workers, ms_per_check);
        eprintln!(
            "There is a {:.0}% chance of finding a seed within {}",
            confidence * 100.0,
            format_duration(ms / 1000.0)
        );
    }
}

/// The match plus the first account's keys
fn json_report(result: &MatchResult, account: &DerivedAccount) -> serde_json::Value {
    serde_json::json!({
        "address": result.address,
        "seed": result.seed,
        "private_key": account.private_key_hex,
        "public_key": account.public_key_hex,
        "chain": account.chain,
        "worker_id": result.worker_id,
        "checks": result.checks,
        "elapsed_ms": result.elapsed_ms,
    })
}

fn print_result(result: &MatchResult, total: Duration) {
    eprintln!(
        "Found in {} (or {:.0}ms)!",
        format_duration(total.as_secs_f64()),
        total.as_secs_f64() * 1000.0
    );
    println!("Vanity address:");
    println!("{}", result.address);
    println!("Make sure to test out and securely save this seed before actually utilizing it!");
    println!("Vanity seed:");
    println!("{}", result.seed);
}
