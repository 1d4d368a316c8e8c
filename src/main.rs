use anyhow::{Context, Result};
use checkers_core::{AlphaBetaEngine, EngineConfig, GameSession};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use selfplay::{play_match, MatchOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod opening;
mod selfplay;

/// Headless self-play between two draughts engines.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Search depth for both sides (overrides the config file).
    #[arg(long)]
    depth: Option<u8>,

    /// Engine tuning file (JSON scale factors over the defaults).
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 200)]
    max_plies: usize,

    /// Random turns played before the engines take over.
    #[arg(long, default_value_t = 0)]
    random_openings: usize,

    #[arg(long)]
    seed: Option<u64>,

    /// Only search captures while one is available.
    #[arg(long)]
    strict_capture: bool,
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            EngineConfig::load_from_json(&json)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    if let Some(depth) = args.depth {
        config.search_depth = depth;
    }
    if args.strict_capture {
        config.forced_capture_in_search = true;
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = Arc::new(load_config(&args)?);
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        "depth={} strict_capture={} seed={seed}",
        config.search_depth, config.forced_capture_in_search
    );

    let mut black = AlphaBetaEngine::new(config.clone());
    let mut red = AlphaBetaEngine::new(config);
    let mut rng = StdRng::seed_from_u64(seed);

    let options = MatchOptions {
        max_plies: args.max_plies,
        random_openings: args.random_openings,
    };
    let report = play_match(GameSession::new(), &mut black, &mut red, options, &mut rng);

    println!("{}", report.session.board());
    println!("{}", report.session.to_fen_string());
    println!("{} after {} plies", report.outcome, report.plies);
    Ok(())
}
