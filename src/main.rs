mod feed;
mod propagator;
mod render;
mod web;

#[cfg(test)]
mod tests;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

use crate::feed::{first_records, HttpFeed, TleCache};
use crate::propagator::{PropagatorHandle, Sgp4Ephemeris};
use crate::render::SceneView;
use crate::web::Config;

#[derive(Parser)]
#[command(name = "cosmic-eye")]
#[command(about = "Real-time orbital position tracking")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve,
    /// Fetch an element set and list its objects
    Fetch { set: Option<String> },
    /// Propagate a set locally and sample it at a fixed frame rate
    Track {
        set: Option<String>,
        /// Track only the first N objects
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value = "10s", value_parser = humantime::parse_duration)]
        duration: Duration,
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=1000))]
        fps: u32,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Fetch { set } => fetch(config, set).await,
        Commands::Track {
            set,
            limit,
            duration,
            fps,
        } => track(config, set, limit, duration, fps).await,
    }
}

async fn serve(config: Config) -> ExitCode {
    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_cache(config: &Config) -> Option<TleCache<HttpFeed>> {
    match HttpFeed::new(&config.feed.url_template, config.feed.timeout) {
        Ok(feed) => Some(TleCache::with_ttl(feed, config.feed.ttl)),
        Err(e) => {
            eprintln!("Error creating HTTP client: {}", e);
            None
        }
    }
}

async fn fetch(config: Config, set: Option<String>) -> ExitCode {
    let set = set.unwrap_or_else(|| config.feed.default_set.clone());
    let Some(cache) = build_cache(&config) else {
        return ExitCode::FAILURE;
    };

    match cache.get(&set).await {
        Ok(fetched) => {
            println!("{}: {} objects", set, fetched.records.len());
            for record in fetched.records.iter() {
                println!("  {}", record.name);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Fetch error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn track(
    config: Config,
    set: Option<String>,
    limit: Option<usize>,
    duration: Duration,
    fps: u32,
) -> ExitCode {
    let set = set.unwrap_or_else(|| config.feed.default_set.clone());
    let Some(cache) = build_cache(&config) else {
        return ExitCode::FAILURE;
    };

    let records = match cache.get(&set).await {
        Ok(fetched) => first_records(&fetched.records, limit),
        Err(e) => {
            eprintln!("Fetch error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let propagator = PropagatorHandle::spawn(Sgp4Ephemeris, config.propagator.settings());
    let mut scene = SceneView::new(propagator.subscribe());

    if let Err(e) = propagator.initialize(records) {
        eprintln!("Propagator error: {}", e);
        return ExitCode::FAILURE;
    }

    let mut frames = tokio::time::interval(Duration::from_secs(1) / fps);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let started = Instant::now();
    let mut frame: u64 = 0;
    while started.elapsed() < duration {
        frames.tick().await;
        let now = Instant::now();
        scene.refresh(now);

        if frame % u64::from(fps) == 0 && !scene.is_empty() {
            let positionable = (0..scene.len())
                .filter_map(|i| scene.position(i, now))
                .count();
            let first = scene.objects(now).into_iter().next();
            log::info!(
                "Frame {}: {}/{} positionable, first {:?}",
                frame,
                positionable,
                scene.len(),
                first
            );
        }
        frame += 1;
    }

    propagator.shutdown().await;
    ExitCode::SUCCESS
}
