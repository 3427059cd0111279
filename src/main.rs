//! Voxel world streaming driver
//!
//! Generates a world and walks a scripted observer across it, logging every
//! chunk window recompute.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use glam::Vec3;

use voxstream::{BlockType, ChunkStreamer, WorldSettings};

/// Stream a procedural voxel world around a moving observer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML settings file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the world seed
    #[arg(long)]
    seed: Option<u32>,

    /// Override the view distance in chunks
    #[arg(long)]
    view_distance: Option<i32>,

    /// Override the background prefetch distance in chunks
    #[arg(long)]
    prefetch: Option<i32>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Observer speed in voxels per tick
    #[arg(long, default_value_t = 0.5)]
    speed: f32,

    /// Walking direction in degrees, 0 = +x
    #[arg(long, default_value_t = 30.0)]
    heading: f32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => WorldSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => WorldSettings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(view_distance) = args.view_distance {
        settings.view_distance = view_distance;
    }
    if let Some(prefetch) = args.prefetch {
        settings.streaming.prefetch_distance = prefetch;
    }
    settings.validate().context("invalid settings")?;

    let mut streamer = ChunkStreamer::new(&settings);
    streamer.generate_world();

    let spawn = streamer.spawn_position();
    print_column(&streamer, spawn);

    let heading = args.heading.to_radians();
    let step = Vec3::new(heading.cos(), 0.0, heading.sin()) * args.speed;
    let mut observer = spawn;

    for tick in 0..args.ticks {
        observer += step;
        if let Some(update) = streamer.tick(observer) {
            tracing::info!(
                "tick {}: entered {:?} (+{} new, +{} reactivated, -{} hidden, {} active)",
                tick,
                streamer.current_coord(),
                update.created.len(),
                update.activated.len(),
                update.deactivated.len(),
                streamer.index().active_count()
            );
        }
    }

    let stats = streamer.stats();
    tracing::info!(
        "Done: {} ticks, {} recomputes, {} chunks created ({} prefetched), {} activations, {} deactivations",
        stats.ticks,
        stats.recomputes,
        stats.created,
        stats.prefetched,
        stats.activated,
        stats.deactivated
    );

    Ok(())
}

fn print_column(streamer: &ChunkStreamer, position: Vec3) {
    let top = streamer.generator().dimensions().chunk_height;
    let surface = streamer
        .generator()
        .terrain_height(position.x.floor() as i32, position.z.floor() as i32);
    println!(
        "Column at x={} z={} (surface {}):",
        position.x, position.z, surface
    );

    for y in (0..top).rev() {
        let block = streamer.get_voxel(Vec3::new(position.x, y as f32, position.z));
        if block != BlockType::Air {
            println!("  y={:>3} {:?}", y, block);
        }
    }
}
