//! CLI demo for canopy
//!
//! Registers the nature recordings, anchors the configured sources around
//! the listener and walks a simulated listener through the scene, logging
//! the attenuated gains.

mod tracker;

use anyhow::{Context, Result};
use audio::{register_configured_assets, HeadlessEngine, SceneHandler, Spatializer, SpatializerConfig};
use audio_io::tone::{generate_tone, write_pcm16_wav};
use audio_io::AssetRegistry;
use clap::Parser;
use glam::Vec3;
use log::{debug, info, warn};
use scene_core::{Pose, SceneCommand, SceneEvent};
use settings_manager::{ConfigManager, Settings};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracker::{run_tracker, WalkingTracker};

const CHANNEL_CAPACITY: usize = 64;

/// canopy - spatial nature soundscape
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,

    /// Config file (defaults to the user config directory)
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Override the directory holding the recordings
    #[clap(long)]
    asset_dir: Option<PathBuf>,

    /// Number of tracking frames to simulate
    #[clap(long, default_value_t = 120)]
    frames: usize,

    /// Milliseconds between tracking frames
    #[clap(long, default_value_t = 33)]
    frame_ms: u64,

    /// Radius of the simulated walk, metres
    #[clap(long, default_value_t = 3.0)]
    radius: f32,

    /// Write tones in place of missing recordings
    #[clap(long)]
    synthesize_missing: bool,

    /// Write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,
}

/// Fill gaps in the asset directory with distinguishable sine tones
fn synthesize_missing_assets(settings: &Settings) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (index, entry) in settings.assets.iter().enumerate() {
        let path = settings.asset_path(entry);
        if path.exists() {
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let tone = generate_tone(220.0 * (index + 1) as f32, 2.0, 48_000);
        write_pcm16_wav(&path, 48_000, 1, &tone)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Synthesized '{}' at {}", entry.identifier, path.display());
        written.push(path);
    }
    Ok(written)
}

fn load_config(args: &Args) -> Result<ConfigManager> {
    let mut config = match &args.config {
        Some(path) => ConfigManager::with_file(path),
        None => ConfigManager::new(),
    }
    .context("Failed to load config")?;

    if let Some(dir) = &args.asset_dir {
        config.settings_mut().asset_dir = dir.clone();
    }
    if args.save_config {
        config.save().context("Failed to save config")?;
        info!("Saved settings to {}", config.config_file().display());
    }
    Ok(config)
}

/// `AddSource` commands for every configured placement whose recording loaded
fn placement_commands(settings: &Settings, skipped: &[String]) -> Vec<SceneCommand> {
    settings
        .scene
        .iter()
        .filter(|placed| {
            let missing = skipped.contains(&placed.asset);
            if missing {
                warn!("Not placing '{}': recording missing", placed.asset);
            }
            !missing
        })
        .map(|placed| SceneCommand::AddSource {
            pose: Pose::from_translation(Vec3::from(placed.position)),
            asset: placed.asset.clone(),
        })
        .collect()
}

/// Run the handler until the walk is over and return the number of frames seen.
///
/// Placements and tracker poses are sent from their own task while events
/// are drained here, so a full event queue never stalls the senders.
async fn run_scene(
    spatializer: Spatializer<HeadlessEngine>,
    placements: Vec<SceneCommand>,
    tracker: WalkingTracker,
    frames: usize,
    interval: Duration,
    capacity: usize,
) -> Result<usize> {
    let (command_tx, command_rx) = mpsc::channel(capacity);
    let (event_tx, mut event_rx) = mpsc::channel(capacity);
    let mut handler = SceneHandler::new(spatializer, command_rx, event_tx);
    let handler_task = tokio::spawn(async move {
        let result = handler.run().await;
        handler.into_spatializer().shutdown();
        result
    });

    let feeder_task = tokio::spawn(async move {
        for command in placements {
            if command_tx.send(command).await.is_err() {
                warn!("Scene handler stopped before every source was placed");
                return;
            }
        }
        run_tracker(tracker, frames, interval, command_tx).await;
    });

    let report_every = (frames / 10).max(1);
    let mut frame = 0;
    while let Some(event) = event_rx.recv().await {
        if let SceneEvent::GainsUpdated(_) = event {
            frame += 1;
        }
        log_event(&event, frame, report_every);
    }

    feeder_task.await?;
    handler_task.await??;
    Ok(frame)
}

fn log_event(event: &SceneEvent, frame: usize, report_every: usize) {
    match event {
        SceneEvent::GainsUpdated(gains) if frame % report_every == 0 => {
            let summary: Vec<String> = gains
                .iter()
                .map(|(id, gain)| format!("{}={:.3}", id, gain))
                .collect();
            info!("frame {}: {}", frame, summary.join(" "));
        }
        SceneEvent::CommandFailed { reason } => warn!("{}", reason),
        SceneEvent::SourceAdded { .. } | SceneEvent::SourceRemoved(_) => info!("{}", event),
        _ => debug!("{}", event),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Configure logging based on debug flag
    if args.debug {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
        debug!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    info!("Starting canopy");

    let config = load_config(&args)?;
    let settings = config.settings().clone();

    if args.synthesize_missing {
        synthesize_missing_assets(&settings)?;
    }

    let mut registry = AssetRegistry::new();
    let skipped = register_configured_assets(&mut registry, &settings, true)?;
    let spatializer = Spatializer::new(
        HeadlessEngine::new(),
        registry,
        &SpatializerConfig::from(&settings),
    )
    .context("Failed to start the spatializer")?;

    let placements = placement_commands(&settings, &skipped);
    let tracker = WalkingTracker::new(Vec3::ZERO, args.radius, args.frames.max(1) as u32);
    let frame = run_scene(
        spatializer,
        placements,
        tracker,
        args.frames,
        Duration::from_millis(args.frame_ms),
        CHANNEL_CAPACITY,
    )
    .await?;

    info!("Exiting canopy after {} frames", frame);
    Ok(())
}
