#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level plans and the loader system that builds a world from one.
//!
//! A [`LevelPlan`] is parsed from a TOML document whose terrain is drawn as
//! ASCII rows, listed top-down the way a level reads on screen. The
//! [`Loader`] turns a plan into batches of world commands: structure first,
//! then creature spawns, then `Start`. School labels in the plan are names;
//! the world allocates the actual ids, so the loader pauses after each spawn
//! that seeds a fresh school and learns the id from the `CreatureSpawned`
//! event before placing the label's remaining members.

use std::collections::HashMap;

use grotto_core::{
    Command, EntityKind, Event, Position, SchoolId, TerrainKind, TileCoord, TileGridConfig,
};
use thiserror::Error;

const SUPPORTED_PLAN_VERSION: u32 = 1;

/// Reasons a level document is rejected.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The document is not valid TOML.
    #[error("level plan is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    /// The document declares a version this loader does not understand.
    #[error("unsupported level plan version {found}, expected {SUPPORTED_PLAN_VERSION}")]
    UnsupportedVersion {
        /// Version the document declared.
        found: u32,
    },
    /// The tile side length is zero.
    #[error("tile length must be at least one pixel")]
    InvalidTileLength,
    /// The terrain section holds no rows, or rows with no columns.
    #[error("the terrain needs at least one row and one column")]
    EmptyGrid,
    /// The terrain rows exceed the supported grid dimensions.
    #[error("the terrain exceeds the supported grid dimensions")]
    GridTooLarge,
    /// A terrain row differs in length from the first row.
    #[error("terrain row {row} differs in length from the first row")]
    RaggedRow {
        /// Zero-based index of the offending row, counted from the top.
        row: usize,
    },
    /// A terrain row holds a glyph outside the terrain alphabet.
    #[error("unknown terrain glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph {
        /// The offending glyph.
        glyph: char,
        /// Zero-based row index, counted from the top.
        row: usize,
        /// Zero-based column index.
        column: usize,
    },
    /// More than one target glyph appears in the terrain.
    #[error("a level may mark at most one target tile")]
    DuplicateTarget,
    /// A creature entry names a kind outside the known set.
    #[error("unknown creature kind {kind:?}")]
    UnknownKind {
        /// The name the entry used.
        kind: String,
    },
    /// A school label is attached to a kind that cannot school.
    #[error("a {kind:?} cannot carry a school label")]
    SchoolForbidden {
        /// Offending kind.
        kind: EntityKind,
    },
}

#[derive(Debug, serde::Deserialize)]
struct PlanFile {
    version: u32,
    grid: GridSection,
    viewport: Option<ViewportSection>,
    #[serde(default)]
    creatures: Vec<CreatureSection>,
}

#[derive(Debug, serde::Deserialize)]
struct GridSection {
    tile_length: u32,
    rows: Vec<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ViewportSection {
    width: u32,
    height: u32,
}

#[derive(Debug, serde::Deserialize)]
struct CreatureSection {
    kind: String,
    x: f64,
    y: f64,
    school: Option<String>,
}

/// One creature placement within a plan.
#[derive(Clone, Debug)]
pub struct Placement {
    kind: EntityKind,
    position: Position,
    school: Option<String>,
}

impl Placement {
    /// Returns the kind to spawn.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the bottom-left spawn position.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the school label, for crawlers placed into a named school.
    #[must_use]
    pub fn school(&self) -> Option<&str> {
        self.school.as_deref()
    }
}

/// Declarative description of one level.
///
/// Terrain rows are listed top-down in the document and mapped onto the
/// bottom-up tile grid here. The glyph alphabet is `.` air, `#` ground,
/// `~` water, `!` magma, and `*` for the target tile, which sits on air.
#[derive(Debug)]
pub struct LevelPlan {
    config: TileGridConfig,
    terrain: Vec<(TileCoord, TerrainKind)>,
    target: Option<TileCoord>,
    viewport: Option<(u32, u32)>,
    creatures: Vec<Placement>,
}

impl LevelPlan {
    /// Parses a plan from TOML contents.
    pub fn from_toml(contents: &str) -> Result<Self, LevelError> {
        let file: PlanFile = toml::from_str(contents)?;
        if file.version != SUPPORTED_PLAN_VERSION {
            return Err(LevelError::UnsupportedVersion {
                found: file.version,
            });
        }
        if file.grid.tile_length == 0 {
            return Err(LevelError::InvalidTileLength);
        }

        let row_count = file.grid.rows.len();
        let column_count = file
            .grid
            .rows
            .first()
            .map(|row| row.chars().count())
            .unwrap_or(0);
        if row_count == 0 || column_count == 0 {
            return Err(LevelError::EmptyGrid);
        }
        let rows = u32::try_from(row_count).map_err(|_| LevelError::GridTooLarge)?;
        let columns = u32::try_from(column_count).map_err(|_| LevelError::GridTooLarge)?;

        let mut terrain = Vec::new();
        let mut target = None;
        for (row_index, line) in file.grid.rows.iter().enumerate() {
            if line.chars().count() != column_count {
                return Err(LevelError::RaggedRow { row: row_index });
            }
            // Rows read top-down in the document; the grid counts from the
            // bottom.
            let grid_row = rows - 1 - row_index as u32;
            for (column_index, glyph) in line.chars().enumerate() {
                let tile = TileCoord::new(column_index as u32, grid_row);
                match classify(glyph) {
                    Some((kind, is_target)) => {
                        if is_target {
                            if target.is_some() {
                                return Err(LevelError::DuplicateTarget);
                            }
                            target = Some(tile);
                        }
                        if kind != TerrainKind::Air {
                            terrain.push((tile, kind));
                        }
                    }
                    None => {
                        return Err(LevelError::UnknownGlyph {
                            glyph,
                            row: row_index,
                            column: column_index,
                        });
                    }
                }
            }
        }

        let mut creatures = Vec::with_capacity(file.creatures.len());
        for entry in file.creatures {
            let kind = parse_kind(&entry.kind).ok_or(LevelError::UnknownKind {
                kind: entry.kind.clone(),
            })?;
            if entry.school.is_some() && kind != EntityKind::Crawler {
                return Err(LevelError::SchoolForbidden { kind });
            }
            creatures.push(Placement {
                kind,
                position: Position::new(entry.x, entry.y),
                school: entry.school,
            });
        }

        Ok(Self {
            config: TileGridConfig::new(columns, rows, file.grid.tile_length),
            terrain,
            target,
            viewport: file
                .viewport
                .map(|section| (section.width, section.height)),
            creatures,
        })
    }

    /// Returns the tile grid dimensions the plan describes.
    #[must_use]
    pub fn config(&self) -> TileGridConfig {
        self.config
    }

    /// Returns the target tile, when the terrain marks one.
    #[must_use]
    pub fn target(&self) -> Option<TileCoord> {
        self.target
    }

    /// Returns the creature placements in spawn order.
    #[must_use]
    pub fn creatures(&self) -> &[Placement] {
        &self.creatures
    }
}

fn classify(glyph: char) -> Option<(TerrainKind, bool)> {
    match glyph {
        '.' => Some((TerrainKind::Air, false)),
        '#' => Some((TerrainKind::Ground, false)),
        '~' => Some((TerrainKind::Water, false)),
        '!' => Some((TerrainKind::Magma, false)),
        '*' => Some((TerrainKind::Air, true)),
        _ => None,
    }
}

fn parse_kind(name: &str) -> Option<EntityKind> {
    match name {
        "player" => Some(EntityKind::Player),
        "rival" => Some(EntityKind::Rival),
        "swimmer" => Some(EntityKind::Swimmer),
        "crawler" => Some(EntityKind::Crawler),
        "plant" => Some(EntityKind::Plant),
        _ => None,
    }
}

/// Pure system that compiles a [`LevelPlan`] into world command batches.
///
/// Call [`Loader::handle`] with the events produced by the previous batch,
/// apply the commands it pushes, and repeat until [`Loader::finished`]. The
/// final batch ends with `Start`.
#[derive(Debug)]
pub struct Loader {
    plan: LevelPlan,
    seed: u64,
    structure_emitted: bool,
    next_placement: usize,
    started: bool,
    schools: HashMap<String, SchoolId>,
    pending_school: Option<String>,
}

impl Loader {
    /// Creates a loader for `plan`, seeding the world's generator with
    /// `seed`.
    #[must_use]
    pub fn new(plan: LevelPlan, seed: u64) -> Self {
        Self {
            plan,
            seed,
            structure_emitted: false,
            next_placement: 0,
            started: false,
            schools: HashMap::new(),
            pending_school: None,
        }
    }

    /// Returns true once the `Start` command has been emitted.
    #[must_use]
    pub fn finished(&self) -> bool {
        self.started
    }

    /// Consumes the previous batch's events and pushes the next batch.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        self.learn_schools(events);
        if self.pending_school.is_some() || self.finished() {
            return;
        }

        if !self.structure_emitted {
            self.emit_structure(out);
            self.structure_emitted = true;
        }

        while self.next_placement < self.plan.creatures.len() {
            let placement = &self.plan.creatures[self.next_placement];
            self.next_placement += 1;

            let label = placement.school.clone();
            let school = label
                .as_ref()
                .and_then(|label| self.schools.get(label).copied());
            out.push(Command::SpawnCreature {
                kind: placement.kind,
                position: placement.position,
                school,
            });

            // A labelled crawler without a learned id seeds the school; the
            // batch ends here so the world can tell us the id it allocated.
            if school.is_none() {
                if let Some(label) = label {
                    self.pending_school = Some(label);
                    return;
                }
            }
        }

        out.push(Command::Start);
        self.started = true;
    }

    fn learn_schools(&mut self, events: &[Event]) {
        if self.pending_school.is_none() {
            return;
        }
        // Unlabelled crawlers also get fresh school ids, so several unknown
        // ids can arrive in one batch. The seeding spawn always closed the
        // batch, which makes the label's id the last unknown one.
        let mut seeded = None;
        for event in events {
            let Event::CreatureSpawned {
                school: Some(id), ..
            } = event
            else {
                continue;
            };
            if self.schools.values().any(|known| known == id) {
                continue;
            }
            seeded = Some(*id);
        }
        if let Some(id) = seeded {
            if let Some(label) = self.pending_school.take() {
                let _ = self.schools.insert(label, id);
            }
        }
    }

    fn emit_structure(&self, out: &mut Vec<Command>) {
        out.push(Command::ConfigureTileGrid {
            columns: self.plan.config.columns(),
            rows: self.plan.config.rows(),
            tile_length: self.plan.config.tile_length(),
        });
        out.push(Command::SeedRng { seed: self.seed });
        for &(tile, terrain) in &self.plan.terrain {
            out.push(Command::SetTerrain { tile, terrain });
        }
        if let Some(tile) = self.plan.target {
            out.push(Command::MarkTarget { tile });
        }
        if let Some((width, height)) = self.plan.viewport {
            out.push(Command::ConfigureViewport { width, height });
        }
    }
}
