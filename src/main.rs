//! Command line entry point for the rating timeline
//!
//! Loads an already normalized match log, runs the rating engine, prints the
//! least-squares and sequential standings, and optionally samples the
//! animation timeline at a given time for an external renderer.

use anyhow::{Context, Result};
use clap::Parser;
use rating_timeline::config::AppConfig;
use rating_timeline::rating::{LeastSquaresRanker, RatingHistory, SequentialRatingUpdater, Standing};
use rating_timeline::timeline::{AnimationSchedule, FrameSampler, PlayerPathBuilder};
use rating_timeline::types::{MatchLog, MatchLogInput};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Rating Timeline - team match ratings and their animated history
#[derive(Parser)]
#[command(
    name = "rating-timeline",
    version,
    about = "Least-squares strengths, sequential ratings and animation frames from team match results",
    long_about = "Reads a normalized JSON match log (rosters and scores per match), estimates a \
                 static least-squares strength per player, replays every match through a \
                 margin-weighted Elo-style update, and can sample the animated rating timeline \
                 at any point for an external renderer."
)]
struct Args {
    /// Normalized match log (JSON)
    #[arg(short, long, value_name = "FILE", help = "Path to the match log (JSON)")]
    matches: PathBuf,

    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Print the rating history of one player
    #[arg(long, value_name = "PLAYER", help = "Print the per-match history of a player")]
    history: Option<String>,

    /// Sample the animation at a timeline position
    #[arg(
        long,
        value_name = "TIME",
        help = "Print the visible animation frame at a timeline position as JSON"
    )]
    frame_time: Option<f64>,

    /// Only show players active in the last N matches (-1 for all)
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    recency: Option<i64>,

    /// Only animate the last N matches (-1 for all)
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    past_matches: Option<i64>,

    /// Dry run mode (validate input and exit)
    #[arg(long, help = "Validate configuration and match log, then exit")]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment, file and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(recency) = args.recency {
        config.animation.recency = usize::try_from(recency).ok();
    }

    if let Some(past) = args.past_matches {
        config.animation.past_matches = usize::try_from(past).ok();
    }

    rating_timeline::config::validate_config(&config)?;
    Ok(config)
}

fn load_matches(path: &Path) -> Result<MatchLog> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read match log {}", path.display()))?;
    let input: MatchLogInput = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse match log {}", path.display()))?;
    MatchLog::try_from(input)
}

fn print_standings(title: &str, standings: &[Standing]) {
    println!("{}:", title);
    for standing in standings {
        println!(
            "{}: {} ({:.3})",
            standing.rank, standing.player_id, standing.rating
        );
    }
}

fn print_history(history: &RatingHistory, player_id: &str) -> Result<()> {
    println!("\n{} rating history:", player_id);
    for (position, rating) in history.played_points(player_id)? {
        println!("  match {:>4}: {:.3}", position, rating);
    }
    Ok(())
}

fn run(args: &Args, config: &AppConfig) -> Result<()> {
    let log = load_matches(&args.matches)?;
    info!(
        "Loaded {} matches for {} players",
        log.matches().len(),
        log.players().len()
    );

    if args.dry_run {
        info!("Dry run completed - configuration and match log are valid");
        return Ok(());
    }

    let strengths = LeastSquaresRanker::new(&config.rating).rank(&log)?;
    let history = SequentialRatingUpdater::new(config.rating.clone())?.run(&log)?;

    print_standings("Least-Squares Ranking", &strengths.ranked());
    if strengths.is_disconnected() {
        println!(
            "(strengths are only comparable within the {} connected groups of players)",
            strengths.components().len()
        );
    }
    println!();
    print_standings("Sequential Ratings", &history.standings());

    if let Some(player_id) = &args.history {
        print_history(&history, player_id)?;
    }

    if let Some(time) = args.frame_time {
        let paths = PlayerPathBuilder::new(config.animation.clone())?.build(&history, &log)?;
        let schedule = AnimationSchedule::new(&config.animation, &log)?;
        let visible: Vec<String> = schedule
            .visible_players(&paths)
            .iter()
            .map(|p| p.player_id().to_string())
            .collect();

        let sampler = FrameSampler::new(paths, &config.animation);
        let mut frame = sampler.sample(time);
        frame.players.retain(|p| visible.iter().any(|v| v == p.player_id));

        println!("{}", serde_json::to_string_pretty(&frame)?);
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("{} v{}", config.service.name, rating_timeline::VERSION);

    if let Err(e) = run(&args, &config) {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
