//! Replaying one command sequence must reproduce the run exactly.
//!
//! The world promises bit-for-bit determinism: the same commands in the same
//! order produce the same events, the same snapshots, and the same outcome.
//! The scripted run below exercises terrain, inputs, autonomous wandering,
//! nourishment, and a school merge, and is replayed twice.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use grotto_core::{
    Command, Direction, EntityId, EntityKind, Event, GameOutcome, Position, SchoolId,
    SchoolSnapshot, TerrainKind, TileCoord,
};
use grotto_world::{apply, query, World};

/// Hashable projection of one creature at the end of a replay.
#[derive(Debug, Eq, Hash, PartialEq)]
struct CreatureRecord {
    id: EntityId,
    kind: EntityKind,
    x_bits: u64,
    y_bits: u64,
    hit_points: u32,
    height: u32,
    facing: Direction,
    sprite_index: u32,
    dead: bool,
    airborne: bool,
    ducking: bool,
    school: Option<SchoolId>,
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    records: Vec<CreatureRecord>,
    schools: Vec<SchoolSnapshot>,
    outcome: GameOutcome,
    elapsed: Duration,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.records.hash(&mut hasher);
        for school in &self.schools {
            school.id.hash(&mut hasher);
            school.members.hash(&mut hasher);
        }
        self.outcome.hash(&mut hasher);
        self.elapsed.hash(&mut hasher);
        hasher.finish()
    }
}

// Spawn order fixes the ids the input commands address.
const PLAYER: EntityId = EntityId::new(1);
const RIVAL: EntityId = EntityId::new(2);

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![Command::ConfigureTileGrid {
        columns: 40,
        rows: 24,
        tile_length: 8,
    }];
    for column in 0..40 {
        commands.push(Command::SetTerrain {
            tile: TileCoord::new(column, 0),
            terrain: TerrainKind::Ground,
        });
    }
    for column in 20..=24 {
        for row in 1..=3 {
            commands.push(Command::SetTerrain {
                tile: TileCoord::new(column, row),
                terrain: TerrainKind::Water,
            });
        }
    }
    commands.push(Command::SetTerrain {
        tile: TileCoord::new(30, 1),
        terrain: TerrainKind::Magma,
    });
    commands.push(Command::MarkTarget {
        tile: TileCoord::new(38, 1),
    });
    commands.push(Command::SeedRng { seed: 0x5EED_CAFE });
    commands.push(Command::ConfigureViewport {
        width: 160,
        height: 120,
    });

    for (kind, x, y, school) in [
        (EntityKind::Player, 16.0, 8.0, None),
        (EntityKind::Rival, 288.0, 8.0, None),
        (EntityKind::Swimmer, 165.0, 12.0, None),
        (EntityKind::Crawler, 60.0, 8.0, None),
        (EntityKind::Crawler, 90.0, 8.0, None),
        (EntityKind::Crawler, 64.0, 8.0, Some(SchoolId::new(1))),
        (EntityKind::Plant, 18.0, 8.0, None),
    ] {
        commands.push(Command::SpawnCreature {
            kind,
            position: Position::new(x, y),
            school,
        });
    }

    commands.push(Command::Start);
    commands.push(Command::StartMove {
        entity: PLAYER,
        direction: Direction::Right,
    });
    commands.push(Command::StartMove {
        entity: RIVAL,
        direction: Direction::Left,
    });
    for _ in 0..10 {
        commands.push(Command::Tick {
            dt: Duration::from_millis(100),
        });
    }
    commands.push(Command::StartJump { entity: PLAYER });
    commands.push(Command::Tick {
        dt: Duration::from_millis(150),
    });
    commands.push(Command::EndJump { entity: PLAYER });
    for _ in 0..5 {
        commands.push(Command::Tick {
            dt: Duration::from_millis(100),
        });
    }
    commands.push(Command::StartDuck { entity: PLAYER });
    for _ in 0..4 {
        commands.push(Command::Tick {
            dt: Duration::from_millis(50),
        });
    }
    commands.push(Command::EndDuck { entity: PLAYER });
    commands.push(Command::EndMove {
        entity: PLAYER,
        direction: Direction::Right,
    });
    for _ in 0..6 {
        commands.push(Command::Tick {
            dt: Duration::from_millis(200),
        });
    }
    commands
}

fn replay(commands: &[Command]) -> ReplayOutcome {
    let mut world = World::new();
    let mut events = Vec::new();
    let mut snapshots = Vec::new();

    for &command in commands {
        apply(&mut world, command, &mut events).expect("the script only holds legal commands");
        snapshots.clear();
        query::snapshot_creatures(&world, &mut snapshots);
        for snapshot in &snapshots {
            assert!(
                snapshot.hit_points <= snapshot.max_hit_points,
                "hit points must stay clamped to the kind ceiling"
            );
        }
    }

    snapshots.clear();
    query::snapshot_creatures(&world, &mut snapshots);
    let records = snapshots
        .iter()
        .map(|snapshot| CreatureRecord {
            id: snapshot.id,
            kind: snapshot.kind,
            x_bits: snapshot.position.x().to_bits(),
            y_bits: snapshot.position.y().to_bits(),
            hit_points: snapshot.hit_points.get(),
            height: snapshot.height,
            facing: snapshot.facing,
            sprite_index: snapshot.sprite_index,
            dead: snapshot.dead,
            airborne: snapshot.airborne,
            ducking: snapshot.ducking,
            school: snapshot.school,
        })
        .collect();
    let mut schools = Vec::new();
    query::snapshot_schools(&world, &mut schools);

    ReplayOutcome {
        events,
        records,
        schools,
        outcome: query::outcome(&world),
        elapsed: query::elapsed(&world),
    }
}

#[test]
fn identical_scripts_reproduce_identical_runs() {
    let commands = scripted_commands();
    let first = replay(&commands);
    let second = replay(&commands);

    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first, second);
}

#[test]
fn the_scripted_run_lands_where_expected() {
    let outcome = replay(&scripted_commands());

    assert_eq!(outcome.outcome, GameOutcome::InProgress);
    assert_eq!(outcome.elapsed, Duration::from_millis(3050));

    let player = outcome
        .records
        .iter()
        .find(|record| record.id == PLAYER)
        .expect("the player survives the run");
    assert_eq!(player.kind, EntityKind::Player);
    assert_eq!(player.hit_points, 150, "one plant consumed at the spawn");
    assert!(!player.ducking);

    assert!(outcome
        .records
        .iter()
        .any(|record| record.id == RIVAL && !record.dead));
    assert!(!outcome
        .records
        .iter()
        .any(|record| record.kind == EntityKind::Plant));

    // The lone crawler joined the pair next to it on the first tick.
    assert!(outcome.events.iter().any(|event| matches!(
        event,
        Event::SchoolsMerged { from, into, .. }
            if *from == SchoolId::new(0) && *into == SchoolId::new(1)
    )));
    assert_eq!(outcome.schools.len(), 1);
    assert_eq!(outcome.schools[0].members.len(), 3);
}
