//! Folding a real run into a report.

use std::time::Duration;

use grotto_core::{Command, EntityKind, GameOutcome, Position, TerrainKind, TileCoord};
use grotto_system_analytics::Analytics;
use grotto_world::{apply, query, World};

#[test]
fn a_fatal_run_is_accounted_in_full() {
    let mut world = World::new();
    let mut events = Vec::new();
    let mut analytics = Analytics::new();

    let columns = query::tile_grid(&world).config().columns();
    for column in 0..columns {
        apply(
            &mut world,
            Command::SetTerrain {
                tile: TileCoord::new(column, 0),
                terrain: TerrainKind::Ground,
            },
            &mut events,
        )
        .expect("terrain fits the grid");
    }
    apply(
        &mut world,
        Command::SetTerrain {
            tile: TileCoord::new(5, 1),
            terrain: TerrainKind::Magma,
        },
        &mut events,
    )
    .expect("terrain fits the grid");
    apply(
        &mut world,
        Command::SpawnCreature {
            kind: EntityKind::Player,
            position: Position::new(40.0, 8.0),
            school: None,
        },
        &mut events,
    )
    .expect("the spawn position is open");
    apply(&mut world, Command::Start, &mut events).expect("the world is ready");
    analytics.observe(&events);

    for _ in 0..8 {
        events.clear();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(200),
            },
            &mut events,
        )
        .expect("ticks within the limit are legal");
        analytics.observe(&events);
    }

    let report = analytics.report();
    assert_eq!(report.ticks(), 8);
    assert_eq!(report.simulated(), Duration::from_millis(1600));
    assert_eq!(report.spawns(), 1);
    assert_eq!(report.terrain_damage(), 100, "two magma charges burn 50 each");
    assert_eq!(report.contact_damage(), 0);
    assert_eq!(report.hit_points_restored(), 0);
    assert_eq!(report.deaths(), 1);
    assert_eq!(report.terminations(), 1);
    assert_eq!(report.outcome(), GameOutcome::Lost);
    assert_eq!(report.outcome(), query::outcome(&world));
    assert!(query::creatures(&world).is_empty());
}

#[test]
fn identical_streams_fold_to_equal_reports() {
    let tick = grotto_core::Event::TimeAdvanced {
        dt: Duration::from_millis(50),
    };
    let stream = vec![tick.clone(), tick.clone(), tick];

    let mut first = Analytics::new();
    first.observe(&stream);
    let mut second = Analytics::new();
    second.observe(&stream[..1]);
    second.observe(&stream[1..]);

    assert_eq!(first.report(), second.report());
}
