#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line runner for the Grotto simulation.
//!
//! Loads a level plan (or the built-in cave), optionally replays a cue sheet
//! against it, then ticks the world until the run resolves or the tick budget
//! is spent. `--report` appends the folded analytics account and `--frame`
//! a character rendering of the final viewport.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use grotto_core::{Command, EntityKind, Event, GameOutcome, TerrainKind, MAX_TICK};
use grotto_rendering::FrameScene;
use grotto_system_analytics::Analytics;
use grotto_system_bootstrap::Bootstrap;
use grotto_system_level::{LevelPlan, Loader};
use grotto_system_script::{CueSheet, Script};
use grotto_world::{apply, query, World};
use log::{info, warn};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

const DEFAULT_PLAN: &str = r#"
version = 1

[grid]
tile_length = 8
rows = [
    '..............................',
    '..............................',
    '..............................',
    '..............................',
    '..............................',
    '..............................',
    '..................~~~~~.......',
    '..................~~~~~.......',
    '....!.............~~~~~.....*.',
    '##############################',
]

[viewport]
width = 160
height = 80

[[creatures]]
kind = "player"
x = 16.0
y = 8.0

[[creatures]]
kind = "rival"
x = 200.0
y = 8.0

[[creatures]]
kind = "swimmer"
x = 150.0
y = 12.0

[[creatures]]
kind = "crawler"
x = 60.0
y = 8.0
school = "pack"

[[creatures]]
kind = "crawler"
x = 80.0
y = 8.0
school = "pack"

[[creatures]]
kind = "crawler"
x = 110.0
y = 8.0

[[creatures]]
kind = "plant"
x = 120.0
y = 8.0
"#;

/// Runs a Grotto level headlessly and reports how it went.
#[derive(Debug, Parser)]
#[command(name = "grotto", version, about)]
struct Args {
    /// Level plan to load instead of the built-in cave (TOML).
    #[arg(long, value_name = "FILE")]
    level: Option<PathBuf>,

    /// Cue sheet steering the player and the rival (TOML).
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Simulated milliseconds per tick, at most 200.
    #[arg(long = "dt-ms", value_name = "MS", default_value_t = 100)]
    dt_ms: u64,

    /// World seed; a fresh one is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the folded run report after the last tick.
    #[arg(long)]
    report: bool,

    /// Print the final viewport as a character frame.
    #[arg(long)]
    frame: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    run(Args::parse())
}

fn run(args: Args) -> Result<()> {
    let dt = Duration::from_millis(args.dt_ms);
    if dt.is_zero() || dt > MAX_TICK {
        bail!(
            "--dt-ms must lie in 1..={}, got {}",
            MAX_TICK.as_millis(),
            args.dt_ms
        );
    }

    let plan_text = match &args.level {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading level plan {}", path.display()))?,
        None => DEFAULT_PLAN.to_owned(),
    };
    let plan = LevelPlan::from_toml(&plan_text).context("parsing the level plan")?;

    let mut script = match &args.script {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading cue sheet {}", path.display()))?;
            let sheet = CueSheet::from_toml(&text).context("parsing the cue sheet")?;
            Some(Script::new(sheet))
        }
        None => None,
    };

    let seed = match args.seed {
        Some(seed) => seed,
        None => ChaCha20Rng::from_entropy().next_u64(),
    };
    info!("running with seed {seed}");

    let mut world = World::new();
    let bootstrap = Bootstrap::default();
    println!("{}", bootstrap.welcome_banner(&world));

    let mut analytics = Analytics::new();
    let mut events: Vec<Event> = Vec::new();
    let mut commands: Vec<Command> = Vec::new();
    let mut boot_events: Vec<Event> = Vec::new();

    let mut loader = Loader::new(plan, seed);
    while !loader.finished() {
        commands.clear();
        loader.handle(&events, &mut commands);
        if commands.is_empty() {
            bail!("the level loader stalled before starting the world");
        }
        events.clear();
        for &command in &commands {
            apply(&mut world, command, &mut events)
                .with_context(|| format!("building the world from the level plan ({command:?})"))?;
        }
        analytics.observe(&events);
        boot_events.extend(events.iter().cloned());
    }

    // The cue sheet learns the player and rival ids from the spawn events, so
    // its first look covers everything that happened while loading.
    events = boot_events;

    let mut completed = 0_u32;
    for _ in 0..args.ticks {
        if let Some(script) = script.as_mut() {
            commands.clear();
            script.handle(&events, &mut commands);
            events.clear();
            for &command in &commands {
                if let Err(error) = apply(&mut world, command, &mut events) {
                    warn!("dropping cue {command:?}: {error}");
                }
            }
            analytics.observe(&events);
        }
        events.clear();
        apply(&mut world, Command::Tick { dt }, &mut events)
            .context("advancing the simulation")?;
        analytics.observe(&events);
        completed += 1;
        if query::outcome(&world) != GameOutcome::InProgress {
            break;
        }
    }

    if let Some(script) = script.as_ref() {
        if !script.finished() {
            info!("the run ended with cues still unplayed");
        }
    }

    let outcome = query::outcome(&world);
    println!(
        "{completed} ticks, {:.1}s simulated, {} creatures, outcome: {}",
        query::elapsed(&world).as_secs_f64(),
        query::creatures(&world).len(),
        describe_outcome(outcome)
    );

    if args.report {
        let report = analytics.report();
        println!("spawns:       {}", report.spawns());
        println!(
            "damage:       {} total ({} contact, {} terrain, {} school, {} boundary)",
            report.total_damage(),
            report.contact_damage(),
            report.terrain_damage(),
            report.school_damage(),
            report.boundary_damage()
        );
        println!("restored:     {}", report.hit_points_restored());
        println!(
            "lifecycle:    {} deaths, {} terminations, {} school merges",
            report.deaths(),
            report.terminations(),
            report.merges()
        );
    }

    if args.frame {
        let mut snapshots = Vec::new();
        query::snapshot_creatures(&world, &mut snapshots);
        let scene = FrameScene::compose(
            query::terrain_view(&world),
            &snapshots,
            query::viewport(&world),
            outcome,
        )
        .context("composing the final frame")?;
        let tile_length = query::tile_grid(&world).config().tile_length();
        print!("{}", text_frame(&scene, tile_length));
    }

    Ok(())
}

fn describe_outcome(outcome: GameOutcome) -> &'static str {
    match outcome {
        GameOutcome::InProgress => "in progress",
        GameOutcome::Won => "won",
        GameOutcome::Lost => "lost",
    }
}

/// Draws the scene one character per tile, top row first.
fn text_frame(scene: &FrameScene, tile_length: u32) -> String {
    let span = i64::from(tile_length.max(1));
    let left = scene.viewport.left;
    let bottom = scene.viewport.bottom;
    let first_column = left.div_euclid(span);
    let last_column = (left + i64::from(scene.viewport.width) - 1).div_euclid(span);
    let first_row = bottom.div_euclid(span);
    let last_row = (bottom + i64::from(scene.viewport.height) - 1).div_euclid(span);
    let columns = (last_column - first_column + 1) as usize;
    let rows = (last_row - first_row + 1) as usize;

    let mut cells = vec!['.'; columns * rows];
    for tile in &scene.tiles {
        let column = i64::from(tile.tile.column()) - first_column;
        let row = i64::from(tile.tile.row()) - first_row;
        if column < 0 || row < 0 || column >= columns as i64 || row >= rows as i64 {
            continue;
        }
        cells[row as usize * columns + column as usize] = terrain_glyph(tile.terrain);
    }
    for creature in &scene.creatures {
        let center_x = left + (creature.origin.x + creature.size.x * 0.5).floor() as i64;
        let center_y = bottom + (creature.origin.y + creature.size.y * 0.5).floor() as i64;
        let column = center_x.div_euclid(span) - first_column;
        let row = center_y.div_euclid(span) - first_row;
        if column < 0 || row < 0 || column >= columns as i64 || row >= rows as i64 {
            continue;
        }
        cells[row as usize * columns + column as usize] =
            creature_glyph(creature.kind, creature.health);
    }

    let mut frame = String::with_capacity((columns + 1) * rows);
    for row in (0..rows).rev() {
        for column in 0..columns {
            frame.push(cells[row * columns + column]);
        }
        frame.push('\n');
    }
    frame
}

fn terrain_glyph(terrain: TerrainKind) -> char {
    match terrain {
        TerrainKind::Air => '.',
        TerrainKind::Ground => '#',
        TerrainKind::Water => '~',
        TerrainKind::Magma => '!',
    }
}

fn creature_glyph(kind: EntityKind, health: f32) -> char {
    if health <= f32::EPSILON {
        return 'x';
    }
    match kind {
        EntityKind::Player => '@',
        EntityKind::Rival => 'R',
        EntityKind::Swimmer => 'S',
        EntityKind::Crawler => 'c',
        EntityKind::Plant => 'p',
    }
}
