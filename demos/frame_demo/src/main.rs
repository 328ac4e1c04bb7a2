//! # frame_demo: sample ECS host
//!
//! Spawns a player with a model and a position, registers the demo systems
//! from a JSON schedule, and drives frames at a fixed rate. When the loop
//! finishes the player's model is removed, which detaches its scene node.
//!
//! ```text
//! frame_demo --frames 120 --frame-rate 60 --schedule schedule.json
//! ```

mod components;
mod frame_loop;
mod systems;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec3;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ecs_runtime::{ComponentType, EntityManager, ScheduleConfig, SystemCatalog, components, handle};

use components::{Model, Position, Scene, Velocity};
use frame_loop::{FrameLoopConfig, FrameTime};
use systems::{Drift, Report, SyncModels};

/// Schedule used when no `--schedule` file is given.
const DEFAULT_SCHEDULE: &str = r#"{
    "systems": [
        { "name": "drift", "order": 0 },
        { "name": "sync_models", "order": 10 },
        { "name": "report", "order": 100 }
    ]
}"#;

#[derive(Debug, Parser)]
#[command(name = "frame_demo", about = "Drive an ECS entity manager from a fixed-rate frame loop")]
struct Args {
    /// Number of frames to run (0 = until interrupted).
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Target frames per second.
    #[arg(long, default_value_t = 60.0)]
    frame_rate: f64,

    /// Log positions every N frames.
    #[arg(long, default_value_t = 30)]
    report_every: u64,

    /// JSON schedule file; defaults to the built-in schedule.
    #[arg(long)]
    schedule: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("frame_demo=info".parse()?))
        .init();

    let args = Args::parse();
    let config = FrameLoopConfig {
        frame_rate: args.frame_rate,
        max_frames: args.frames,
    };
    config.frame_duration().context("invalid --frame-rate")?;

    let schedule = match &args.schedule {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading schedule {}", path.display()))?;
            ScheduleConfig::from_json_str(&source)?
        }
        None => ScheduleConfig::from_json_str(DEFAULT_SCHEDULE)?,
    };

    let scene = Scene::shared();
    let mut ecs: EntityManager<FrameTime> = EntityManager::new();

    let player = ecs.create_entity(components![
        Model::load("models/box", &scene),
        Position::new(0.0, 20.0, 0.0),
        Velocity(Vec3::new(0.0, 0.0, 1.0)),
    ]);
    ecs.create_entity(components![Position::new(5.0, 0.0, 0.0)]);
    info!(player = %player, entities = ecs.list_entities().len(), "scene populated");

    let catalog = SystemCatalog::new()
        .with("drift", handle(Drift))
        .with("sync_models", handle(SyncModels))
        .with(
            "report",
            handle(Report {
                every: args.report_every,
            }),
        );
    ecs.apply_schedule(&schedule, &catalog)?;

    let frames = frame_loop::run(&mut ecs, &config)?;

    if let Some(model) = ecs.get::<Model>(player)? {
        let at = scene.borrow().translation(model.node());
        info!(frames, node = model.node(), ?at, "model position after run");
    }

    ecs.remove_component(player, ComponentType::of::<Model>())?;
    info!(
        nodes = scene.borrow().node_count(),
        has_model = ecs.has_component(player, &[ComponentType::of::<Model>()])?,
        "player model removed"
    );

    info!("frame demo shut down");
    Ok(())
}
