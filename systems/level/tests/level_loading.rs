//! Loading a plan into a live world, batch by batch.

use grotto_core::{EntityKind, TerrainKind, TileCoord};
use grotto_system_level::{LevelPlan, Loader};
use grotto_world::{apply, query, World};

const PLAN: &str = r#"
version = 1

[grid]
tile_length = 8
rows = [
    '........',
    '.*......',
    '...~~...',
    '########',
]

[viewport]
width = 48
height = 24

[[creatures]]
kind = "player"
x = 2.0
y = 8.0

[[creatures]]
kind = "crawler"
x = 20.0
y = 8.0
school = "west"

[[creatures]]
kind = "crawler"
x = 48.0
y = 8.0
school = "east"

[[creatures]]
kind = "crawler"
x = 30.0
y = 8.0
school = "west"

[[creatures]]
kind = "plant"
x = 40.0
y = 8.0
"#;

fn load(plan: LevelPlan, seed: u64) -> World {
    let mut world = World::new();
    let mut loader = Loader::new(plan, seed);
    let mut events = Vec::new();
    let mut commands = Vec::new();

    while !loader.finished() {
        commands.clear();
        loader.handle(&events, &mut commands);
        assert!(!commands.is_empty(), "the loader must make progress");
        events.clear();
        for &command in &commands {
            apply(&mut world, command, &mut events).expect("plan commands are legal");
        }
    }
    world
}

#[test]
fn a_plan_builds_a_started_world() {
    let plan = LevelPlan::from_toml(PLAN).expect("plan should parse");
    let world = load(plan, 99);

    assert!(query::started(&world));
    assert_eq!(query::target_tile(&world), Some(TileCoord::new(1, 2)));

    let view = query::terrain_view(&world);
    assert_eq!(view.config().columns(), 8);
    assert_eq!(view.config().rows(), 4);
    assert_eq!(
        view.terrain_at(TileCoord::new(0, 0)),
        Some(TerrainKind::Ground)
    );
    assert_eq!(
        view.terrain_at(TileCoord::new(3, 1)),
        Some(TerrainKind::Water)
    );
    assert_eq!(
        view.terrain_at(TileCoord::new(0, 3)),
        Some(TerrainKind::Air)
    );

    let viewport = query::viewport(&world);
    assert_eq!((viewport.width, viewport.height), (48, 24));

    let creatures = query::creatures(&world);
    assert_eq!(creatures.len(), 5);
    assert_eq!(creatures[0].kind(), EntityKind::Player);
}

#[test]
fn school_labels_group_crawlers() {
    let plan = LevelPlan::from_toml(PLAN).expect("plan should parse");
    let world = load(plan, 7);

    let crawlers: Vec<_> = query::creatures(&world)
        .iter()
        .filter(|creature| creature.kind() == EntityKind::Crawler)
        .collect();
    assert_eq!(crawlers.len(), 3);

    let west_one = crawlers[0].school().expect("crawlers always school");
    let east = crawlers[1].school().expect("crawlers always school");
    let west_two = crawlers[2].school().expect("crawlers always school");
    assert_eq!(west_one, west_two, "one label, one school");
    assert_ne!(west_one, east, "labels separate schools");

    let mut schools = Vec::new();
    query::snapshot_schools(&world, &mut schools);
    assert_eq!(schools.len(), 2);
}
