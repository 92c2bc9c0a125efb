#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared contracts for the Grotto simulation.
//!
//! The crate defines the vocabulary exchanged between the authoritative world
//! and the pure systems around it: identifiers, kinematic primitives, the
//! command/event surface, the error taxonomy, and the read-model snapshot
//! types. It holds no behaviour beyond small value-type helpers.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Banner shown when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to the Grotto!";

/// Longest time interval a single tick may cover.
pub const MAX_TICK: Duration = Duration::from_millis(200);

/// Worst-case displacement, in pixels, a creature may travel between two
/// collision checks.
pub const SUB_STEP_DISPLACEMENT: f64 = 0.01;

/// Seconds a creature stays immune after taking contact damage. Creatures
/// also spawn with this much immunity.
pub const IMMUNITY_WINDOW_SECONDS: f64 = 0.6;

/// Seconds a dead creature lingers in the world before termination.
pub const DEATH_GRACE_SECONDS: f64 = 0.6;

/// Seconds of continuous terrain overlap per hit-point deduction.
pub const TERRAIN_DAMAGE_PERIOD_SECONDS: f64 = 0.2;

/// Seconds each frame of the walk cycle is shown.
pub const SPRITE_FRAME_SECONDS: f64 = 0.075;

/// Identifier assigned to a creature when it is spawned.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates an identifier from its raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value backing the identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Identifier of a crawler school.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct SchoolId(u32);

impl SchoolId {
    /// Creates an identifier from its raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value backing the identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Closed set of creature kinds inhabiting a world.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum EntityKind {
    /// The primary player-driven creature.
    Player,
    /// The optional secondary player-driven creature.
    Rival,
    /// Water-dwelling enemy with periodic autonomous movement.
    Swimmer,
    /// Ground enemy that moves in schools.
    Crawler,
    /// Stationary one-shot heal pickup.
    Plant,
}

/// Movement direction with a signed unit factor.
///
/// Horizontal and vertical directions are tracked independently per creature;
/// `Null` marks the axis at rest.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Direction {
    /// No motion on the axis.
    Null,
    /// Negative x.
    Left,
    /// Positive x.
    Right,
    /// Positive y.
    Up,
    /// Negative y.
    Down,
}

impl Direction {
    /// Signed unit factor applied to speeds along this direction.
    #[must_use]
    pub const fn factor(self) -> f64 {
        match self {
            Self::Null => 0.0,
            Self::Left | Self::Down => -1.0,
            Self::Right | Self::Up => 1.0,
        }
    }

    /// Whether the direction lies on the horizontal axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Whether the direction lies on the vertical axis.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// Terrain classification of one tile.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum TerrainKind {
    /// Empty space.
    Air,
    /// Solid rock; the only impassable terrain.
    Ground,
    /// Liquid; damages land dwellers over time.
    Water,
    /// Liquid; damages everything over time.
    Magma,
}

impl TerrainKind {
    /// Every terrain kind, in index order.
    pub const ALL: [Self; 4] = [Self::Air, Self::Ground, Self::Water, Self::Magma];

    /// Whether creatures may occupy tiles of this terrain.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Ground)
    }

    /// Stable index of the kind within [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Air => 0,
            Self::Ground => 1,
            Self::Water => 2,
            Self::Magma => 3,
        }
    }
}

/// Column/row address of a tile. Row zero is the bottom row.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a coordinate from its column and row.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Returns the column of the coordinate.
    #[must_use]
    pub const fn column(self) -> u32 {
        self.column
    }

    /// Returns the row of the coordinate.
    #[must_use]
    pub const fn row(self) -> u32 {
        self.row
    }
}

/// Dimensions of the tile grid backing a world.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct TileGridConfig {
    columns: u32,
    rows: u32,
    tile_length: u32,
}

impl TileGridConfig {
    /// Creates a configuration from grid dimensions and tile side length.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, tile_length: u32) -> Self {
        Self {
            columns,
            rows,
            tile_length,
        }
    }

    /// Returns the number of tile columns.
    #[must_use]
    pub const fn columns(self) -> u32 {
        self.columns
    }

    /// Returns the number of tile rows.
    #[must_use]
    pub const fn rows(self) -> u32 {
        self.rows
    }

    /// Returns the tile side length in pixels.
    #[must_use]
    pub const fn tile_length(self) -> u32 {
        self.tile_length
    }

    /// Returns the world width in pixels.
    #[must_use]
    pub const fn width_px(self) -> i64 {
        self.columns as i64 * self.tile_length as i64
    }

    /// Returns the world height in pixels.
    #[must_use]
    pub const fn height_px(self) -> i64 {
        self.rows as i64 * self.tile_length as i64
    }
}

/// Clamped hit-point count of one creature.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct HitPoints(u32);

impl HitPoints {
    /// The empty count marking a dead creature.
    pub const ZERO: Self = Self(0);

    /// Creates a count from its raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value backing the count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether the count is exhausted.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Adds `amount`, clamping at `max`.
    #[must_use]
    pub const fn gain(self, amount: u32, max: Self) -> Self {
        let raised = self.0.saturating_add(amount);
        if raised > max.0 {
            max
        } else {
            Self(raised)
        }
    }

    /// Subtracts `amount`, clamping at zero.
    #[must_use]
    pub const fn lose(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }
}

/// Continuous 2D position. One distance unit equals one displayed pixel.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    /// Creates a position from continuous coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the continuous x coordinate.
    #[must_use]
    pub const fn x(self) -> f64 {
        self.x
    }

    /// Returns the continuous y coordinate.
    #[must_use]
    pub const fn y(self) -> f64 {
        self.y
    }

    /// Returns the displayed pixel column, the floor of x.
    #[must_use]
    pub fn displayed_x(self) -> i64 {
        self.x.floor() as i64
    }

    /// Returns the displayed pixel row, the floor of y.
    #[must_use]
    pub fn displayed_y(self) -> i64 {
        self.y.floor() as i64
    }
}

/// Progress of a run towards its win or loss condition.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum GameOutcome {
    /// Neither condition has triggered yet.
    #[default]
    InProgress,
    /// The player reached the target tile.
    Won,
    /// The player was terminated.
    Lost,
}

/// Why a creature's hit points changed.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum HitPointCause {
    /// Continuous overlap with a damaging terrain.
    Terrain(TerrainKind),
    /// Contact with a creature of the given kind.
    Contact(EntityKind),
    /// One-point school-wide deduction after a schoolmate took damage.
    SchoolLevy,
    /// Redistribution while a crawler switched schools.
    SchoolTransfer,
    /// A player consumed a plant.
    Nourished,
    /// The creature left the world bounds.
    OutOfBounds,
}

/// Input operation attempted on a creature, used in error reports.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum CreatureAction {
    /// Begin horizontal movement.
    StartMove,
    /// End horizontal movement.
    EndMove,
    /// Begin a jump.
    StartJump,
    /// End a jump.
    EndJump,
    /// Begin ducking.
    StartDuck,
    /// End ducking.
    EndDuck,
}

impl fmt::Display for CreatureAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::StartMove => "start-move",
            Self::EndMove => "end-move",
            Self::StartJump => "start-jump",
            Self::EndJump => "end-jump",
            Self::StartDuck => "start-duck",
            Self::EndDuck => "end-duck",
        };
        f.write_str(label)
    }
}

/// Requests accepted by the world.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub enum Command {
    /// Replaces the tile grid and resets the level.
    ConfigureTileGrid {
        /// Number of tile columns.
        columns: u32,
        /// Number of tile rows.
        rows: u32,
        /// Tile side length in pixels.
        tile_length: u32,
    },
    /// Reclassifies the terrain of one tile.
    SetTerrain {
        /// Tile to reclassify.
        tile: TileCoord,
        /// Terrain it takes on.
        terrain: TerrainKind,
    },
    /// Designates the tile whose occupation wins the run.
    MarkTarget {
        /// The target tile.
        tile: TileCoord,
    },
    /// Seeds the generator from which per-creature generators derive.
    SeedRng {
        /// Base seed of the run.
        seed: u64,
    },
    /// Adds a creature to the not-yet-started world.
    SpawnCreature {
        /// Kind of the creature.
        kind: EntityKind,
        /// Bottom-left continuous position.
        position: Position,
        /// Existing school to join; `None` lets a crawler seed a fresh one.
        school: Option<SchoolId>,
    },
    /// Resizes the visible window.
    ConfigureViewport {
        /// Window width in pixels.
        width: u32,
        /// Window height in pixels.
        height: u32,
    },
    /// Freezes the world structure and begins the run.
    Start,
    /// Advances the simulation by one tick.
    Tick {
        /// Simulated time covered by the tick.
        dt: Duration,
    },
    /// Begins horizontal movement of a creature.
    StartMove {
        /// Creature to move.
        entity: EntityId,
        /// `Left` or `Right`.
        direction: Direction,
    },
    /// Ends horizontal movement of a creature. A no-op when the creature is
    /// not moving in the given direction.
    EndMove {
        /// Creature to stop.
        entity: EntityId,
        /// Direction to release.
        direction: Direction,
    },
    /// Launches a creature into a jump.
    StartJump {
        /// Creature to launch.
        entity: EntityId,
    },
    /// Cuts a jump short, zeroing any remaining upward speed.
    EndJump {
        /// Creature whose jump ends.
        entity: EntityId,
    },
    /// Begins ducking.
    StartDuck {
        /// Creature that ducks.
        entity: EntityId,
    },
    /// Ends ducking.
    EndDuck {
        /// Creature that stands back up.
        entity: EntityId,
    },
}

/// Facts emitted by the world while executing commands.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Event {
    /// The world structure froze and the run began.
    WorldStarted,
    /// A creature entered the world.
    CreatureSpawned {
        /// Identifier of the new creature.
        entity: EntityId,
        /// Kind of the new creature.
        kind: EntityKind,
        /// School it joined, for crawlers.
        school: Option<SchoolId>,
    },
    /// One tick of simulated time elapsed.
    TimeAdvanced {
        /// Interval the tick covered.
        dt: Duration,
    },
    /// A creature's hit points changed.
    HitPointsChanged {
        /// Affected creature.
        entity: EntityId,
        /// Count before the change.
        before: HitPoints,
        /// Count after the change.
        after: HitPoints,
        /// What caused the change.
        cause: HitPointCause,
    },
    /// A creature's hit points reached zero.
    CreatureDied {
        /// The dead creature.
        entity: EntityId,
    },
    /// A creature was removed from the world.
    CreatureTerminated {
        /// The removed creature.
        entity: EntityId,
        /// Kind it had.
        kind: EntityKind,
    },
    /// A crawler moved between schools.
    SchoolsMerged {
        /// The crawler that switched membership.
        mover: EntityId,
        /// School it left.
        from: SchoolId,
        /// School it joined.
        into: SchoolId,
    },
    /// The run outcome latched to a terminal state.
    OutcomeChanged {
        /// The latched outcome.
        outcome: GameOutcome,
    },
}

/// Reasons the world refuses a command.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum WorldError {
    /// A spawn position lies outside the world bounds.
    #[error("position ({x}, {y}) lies outside the world bounds")]
    InvalidPosition {
        /// Offending x coordinate.
        x: f64,
        /// Offending y coordinate.
        y: f64,
    },
    /// A tick interval exceeds [`MAX_TICK`].
    #[error("tick interval {dt:?} exceeds the permitted {MAX_TICK:?}")]
    InvalidTickInterval {
        /// Offending interval.
        dt: Duration,
    },
    /// A tile coordinate lies outside the grid.
    #[error("tile ({}, {}) lies outside the grid", .tile.column(), .tile.row())]
    InvalidTile {
        /// Offending coordinate.
        tile: TileCoord,
    },
    /// A grid was configured with a zero tile side.
    #[error("tile length must be at least one pixel")]
    InvalidTileLength,
    /// A structural command arrived after the world started.
    #[error("the world structure is frozen once the run starts")]
    StructureFrozen,
    /// `Start` arrived twice.
    #[error("the run has already been started")]
    AlreadyStarted,
    /// A tick arrived before `Start`.
    #[error("the run has not been started yet")]
    NotStarted,
    /// An input command named a creature the world does not hold.
    #[error("no creature {} inhabits the world", .entity.get())]
    UnknownEntity {
        /// The unknown identifier.
        entity: EntityId,
    },
    /// A spawn named a school the world does not hold.
    #[error("no school {} exists", .school.get())]
    UnknownSchool {
        /// The unknown identifier.
        school: SchoolId,
    },
    /// A spawn attached a school to a kind that cannot join one.
    #[error("a {kind:?} cannot belong to a school")]
    SchoolKindMismatch {
        /// Offending kind.
        kind: EntityKind,
    },
    /// A second player or rival spawn arrived.
    #[error("a {kind:?} is already present")]
    PlayerAlreadyPresent {
        /// The duplicated kind.
        kind: EntityKind,
    },
    /// An input operation violated its precondition.
    #[error("{action} is illegal for creature {} in its current state", .entity.get())]
    IllegalAction {
        /// Creature the operation targeted.
        entity: EntityId,
        /// The operation attempted.
        action: CreatureAction,
    },
}

/// Owned read-model record of one creature.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct CreatureSnapshot {
    /// Identifier of the creature.
    pub id: EntityId,
    /// Kind of the creature.
    pub kind: EntityKind,
    /// Bottom-left continuous position.
    pub position: Position,
    /// Body width in pixels.
    pub width: u32,
    /// Body height in pixels, accounting for ducking.
    pub height: u32,
    /// Last horizontal direction faced.
    pub facing: Direction,
    /// Current hit points.
    pub hit_points: HitPoints,
    /// Kind-specific hit-point maximum.
    pub max_hit_points: HitPoints,
    /// Whether contact damage is currently suppressed.
    pub immune: bool,
    /// Whether the creature is dead and lingering.
    pub dead: bool,
    /// Whether the creature is ducking.
    pub ducking: bool,
    /// Whether the creature is off the ground.
    pub airborne: bool,
    /// Index of the sprite to display.
    pub sprite_index: u32,
    /// School membership, for crawlers.
    pub school: Option<SchoolId>,
}

/// Owned read-model record of one school.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SchoolSnapshot {
    /// Identifier of the school.
    pub id: SchoolId,
    /// Member creatures, sorted by id.
    pub members: Vec<EntityId>,
}

/// Visible-window rectangle in world pixels.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ViewportSnapshot {
    /// Left edge of the window.
    pub left: i64,
    /// Bottom edge of the window.
    pub bottom: i64,
    /// Window width in pixels.
    pub width: u32,
    /// Window height in pixels.
    pub height: u32,
}

/// Read-only view over the terrain of a tile grid.
#[derive(Clone, Copy, Debug)]
pub struct TerrainView<'a> {
    config: TileGridConfig,
    terrain: &'a [TerrainKind],
}

impl<'a> TerrainView<'a> {
    /// Creates a view over `terrain` stored row-major from the bottom row.
    #[must_use]
    pub fn new(config: TileGridConfig, terrain: &'a [TerrainKind]) -> Self {
        Self { config, terrain }
    }

    /// Returns the grid configuration the view spans.
    #[must_use]
    pub fn config(&self) -> TileGridConfig {
        self.config
    }

    /// Returns the terrain cells, row-major from the bottom row.
    #[must_use]
    pub fn terrain(&self) -> &'a [TerrainKind] {
        self.terrain
    }

    /// Returns the terrain of `tile`, or `None` outside the grid.
    #[must_use]
    pub fn terrain_at(&self, tile: TileCoord) -> Option<TerrainKind> {
        if tile.column() >= self.config.columns() || tile.row() >= self.config.rows() {
            return None;
        }

        let index = usize::try_from(tile.row())
            .ok()?
            .checked_mul(usize::try_from(self.config.columns()).ok()?)?
            .checked_add(usize::try_from(tile.column()).ok()?)?;
        self.terrain.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Command, CreatureSnapshot, Direction, EntityId, EntityKind, Event, GameOutcome,
        HitPointCause, HitPoints, Position, SchoolId, TerrainKind, TerrainView, TileCoord,
        TileGridConfig, WorldError, MAX_TICK,
    };
    use std::time::Duration;

    #[test]
    fn direction_factors_are_signed_units() {
        assert_eq!(Direction::Null.factor(), 0.0);
        assert_eq!(Direction::Left.factor(), -1.0);
        assert_eq!(Direction::Right.factor(), 1.0);
        assert_eq!(Direction::Up.factor(), 1.0);
        assert_eq!(Direction::Down.factor(), -1.0);
        assert!(Direction::Left.is_horizontal());
        assert!(Direction::Up.is_vertical());
        assert!(!Direction::Null.is_horizontal());
    }

    #[test]
    fn only_ground_is_impassable() {
        for terrain in TerrainKind::ALL {
            assert_eq!(terrain.is_passable(), terrain != TerrainKind::Ground);
            assert_eq!(TerrainKind::ALL[terrain.index()], terrain);
        }
    }

    #[test]
    fn hit_points_clamp_on_both_ends() {
        let max = HitPoints::new(140);
        assert_eq!(HitPoints::new(139).gain(5, max), max);
        assert_eq!(HitPoints::new(100).gain(5, max), HitPoints::new(105));
        assert_eq!(HitPoints::new(3).lose(5), HitPoints::ZERO);
        assert!(HitPoints::new(3).lose(5).is_zero());
    }

    #[test]
    fn displayed_coordinates_floor_continuous_ones() {
        let position = Position::new(12.97, 7.01);
        assert_eq!(position.displayed_x(), 12);
        assert_eq!(position.displayed_y(), 7);

        let negative = Position::new(-0.25, -1.5);
        assert_eq!(negative.displayed_x(), -1);
        assert_eq!(negative.displayed_y(), -2);
    }

    #[test]
    fn grid_config_reports_pixel_size() {
        let config = TileGridConfig::new(20, 12, 8);
        assert_eq!(config.width_px(), 160);
        assert_eq!(config.height_px(), 96);
    }

    #[test]
    fn terrain_view_addresses_row_major_from_bottom() {
        let terrain = [
            TerrainKind::Ground,
            TerrainKind::Ground,
            TerrainKind::Air,
            TerrainKind::Water,
        ];
        let view = TerrainView::new(TileGridConfig::new(2, 2, 8), &terrain);

        assert_eq!(view.terrain_at(TileCoord::new(0, 0)), Some(TerrainKind::Ground));
        assert_eq!(view.terrain_at(TileCoord::new(1, 1)), Some(TerrainKind::Water));
        assert_eq!(view.terrain_at(TileCoord::new(2, 0)), None);
        assert_eq!(view.terrain_at(TileCoord::new(0, 2)), None);
    }

    #[test]
    fn commands_round_trip_through_bincode() {
        let commands = [
            Command::ConfigureTileGrid {
                columns: 24,
                rows: 10,
                tile_length: 8,
            },
            Command::SetTerrain {
                tile: TileCoord::new(3, 0),
                terrain: TerrainKind::Magma,
            },
            Command::SpawnCreature {
                kind: EntityKind::Crawler,
                position: Position::new(18.5, 8.0),
                school: Some(SchoolId::new(2)),
            },
            Command::Tick {
                dt: Duration::from_millis(100),
            },
            Command::StartMove {
                entity: EntityId::new(1),
                direction: Direction::Right,
            },
        ];

        for command in commands {
            let bytes = bincode::serialize(&command).expect("serialize command");
            let decoded: Command = bincode::deserialize(&bytes).expect("deserialize command");
            assert_eq!(decoded, command);
        }
    }

    #[test]
    fn events_round_trip_through_bincode() {
        let events = [
            Event::CreatureSpawned {
                entity: EntityId::new(4),
                kind: EntityKind::Swimmer,
                school: None,
            },
            Event::HitPointsChanged {
                entity: EntityId::new(4),
                before: HitPoints::new(100),
                after: HitPoints::new(50),
                cause: HitPointCause::Contact(EntityKind::Player),
            },
            Event::OutcomeChanged {
                outcome: GameOutcome::Won,
            },
        ];

        for event in &events {
            let bytes = bincode::serialize(event).expect("serialize event");
            let decoded: Event = bincode::deserialize(&bytes).expect("deserialize event");
            assert_eq!(&decoded, event);
        }
    }

    #[test]
    fn creature_snapshots_round_trip_through_bincode() {
        let snapshot = CreatureSnapshot {
            id: EntityId::new(7),
            kind: EntityKind::Player,
            position: Position::new(40.25, 16.0),
            width: 6,
            height: 12,
            facing: Direction::Right,
            hit_points: HitPoints::new(98),
            max_hit_points: HitPoints::new(500),
            immune: true,
            dead: false,
            ducking: false,
            airborne: true,
            sprite_index: 2,
            school: None,
        };

        let bytes = bincode::serialize(&snapshot).expect("serialize snapshot");
        let decoded: CreatureSnapshot = bincode::deserialize(&bytes).expect("deserialize snapshot");
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn tick_interval_error_names_the_limit() {
        let error = WorldError::InvalidTickInterval {
            dt: Duration::from_millis(250),
        };
        let message = error.to_string();
        assert!(message.contains("250ms"));
        assert!(message.contains(&format!("{MAX_TICK:?}")));
    }
}
