#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Grotto adapters.

use anyhow::{ensure, Result as AnyResult};
use glam::Vec2;
use grotto_core::{
    CreatureSnapshot, Direction, EntityId, EntityKind, GameOutcome, TerrainKind, TerrainView,
    TileCoord, ViewportSnapshot,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Fill color for a terrain kind. Air doubles as the clear color.
#[must_use]
pub const fn terrain_color(terrain: TerrainKind) -> Color {
    match terrain {
        TerrainKind::Air => Color::from_rgb_u8(24, 22, 32),
        TerrainKind::Ground => Color::from_rgb_u8(94, 70, 48),
        TerrainKind::Water => Color::from_rgb_u8(38, 92, 166),
        TerrainKind::Magma => Color::from_rgb_u8(206, 66, 18),
    }
}

/// Base body color for a creature kind.
#[must_use]
pub const fn creature_color(kind: EntityKind) -> Color {
    match kind {
        EntityKind::Player => Color::from_rgb_u8(70, 162, 74),
        EntityKind::Rival => Color::from_rgb_u8(150, 74, 182),
        EntityKind::Swimmer => Color::from_rgb_u8(64, 178, 198),
        EntityKind::Crawler => Color::from_rgb_u8(196, 60, 54),
        EntityKind::Plant => Color::from_rgb_u8(122, 192, 70),
    }
}

/// Body color for one snapshot: corpses fade out, immune bodies flash pale.
#[must_use]
pub fn body_color(snapshot: &CreatureSnapshot) -> Color {
    let base = creature_color(snapshot.kind);
    if snapshot.dead {
        base.lighten(0.6)
    } else if snapshot.immune {
        base.lighten(0.25)
    } else {
        base
    }
}

/// Filled fraction of a creature's health bar, in 0.0..=1.0.
#[must_use]
pub fn health_fraction(snapshot: &CreatureSnapshot) -> f32 {
    let max = snapshot.max_hit_points.get();
    if max == 0 {
        return 0.0;
    }
    (snapshot.hit_points.get() as f32 / max as f32).clamp(0.0, 1.0)
}

/// One visible tile, positioned relative to the viewport origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Coordinate of the tile within the grid.
    pub tile: TileCoord,
    /// Terrain drawn at the tile.
    pub terrain: TerrainKind,
    /// Bottom-left corner in screen pixels.
    pub origin: Vec2,
    /// Side length in pixels.
    pub length: f32,
    /// Fill color.
    pub color: Color,
}

/// One visible creature, positioned relative to the viewport origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CreaturePresentation {
    /// Identifier allocated to the creature by the world.
    pub id: EntityId,
    /// Kind of the creature.
    pub kind: EntityKind,
    /// Bottom-left corner in screen pixels.
    pub origin: Vec2,
    /// Body size in pixels, accounting for ducking.
    pub size: Vec2,
    /// Body fill color.
    pub color: Color,
    /// Sprite sheet index for the current pose.
    pub sprite_index: u32,
    /// Side the creature faces.
    pub facing: Direction,
    /// Filled fraction of the health bar.
    pub health: f32,
}

/// Scene description for one frame: what the viewport shows of the world.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameScene {
    /// Window rectangle the scene covers, in world pixels.
    pub viewport: ViewportSnapshot,
    /// Visible non-air tiles, bottom row first.
    pub tiles: Vec<TilePresentation>,
    /// Visible creatures, in id order.
    pub creatures: Vec<CreaturePresentation>,
    /// Latest run outcome, for the scene's overlay.
    pub outcome: GameOutcome,
}

impl FrameScene {
    /// Composes the scene visible through `viewport`.
    ///
    /// Returns an error when the terrain view disagrees with its own grid
    /// configuration or the viewport has no drawable area.
    pub fn compose(
        terrain: TerrainView<'_>,
        creatures: &[CreatureSnapshot],
        viewport: ViewportSnapshot,
        outcome: GameOutcome,
    ) -> AnyResult<Self> {
        let config = terrain.config();
        ensure!(
            viewport.width > 0 && viewport.height > 0,
            "viewport {}x{} has no drawable area",
            viewport.width,
            viewport.height
        );
        ensure!(
            config.tile_length() > 0,
            "tile length must be positive to rasterize the grid"
        );
        let cells = config.columns() as u64 * config.rows() as u64;
        ensure!(
            terrain.terrain().len() as u64 == cells,
            "terrain view holds {} cells, the {}x{} grid needs {}",
            terrain.terrain().len(),
            config.columns(),
            config.rows(),
            cells
        );

        let left = viewport.left;
        let bottom = viewport.bottom;
        let right = left + i64::from(viewport.width) - 1;
        let top = bottom + i64::from(viewport.height) - 1;
        let tile_span = i64::from(config.tile_length());

        let mut tiles = Vec::new();
        let first_column = left.div_euclid(tile_span).max(0);
        let last_column = right.div_euclid(tile_span).min(i64::from(config.columns()) - 1);
        let first_row = bottom.div_euclid(tile_span).max(0);
        let last_row = top.div_euclid(tile_span).min(i64::from(config.rows()) - 1);
        for row in first_row..=last_row {
            for column in first_column..=last_column {
                let tile = TileCoord::new(column as u32, row as u32);
                let Some(kind) = terrain.terrain_at(tile) else {
                    continue;
                };
                if kind == TerrainKind::Air {
                    continue;
                }
                tiles.push(TilePresentation {
                    tile,
                    terrain: kind,
                    origin: Vec2::new(
                        (column * tile_span - left) as f32,
                        (row * tile_span - bottom) as f32,
                    ),
                    length: config.tile_length() as f32,
                    color: terrain_color(kind),
                });
            }
        }

        let mut visible = Vec::new();
        for snapshot in creatures {
            let x = snapshot.position.displayed_x();
            let y = snapshot.position.displayed_y();
            let width = i64::from(snapshot.width);
            let height = i64::from(snapshot.height);
            if x > right || x + width <= left || y > top || y + height <= bottom {
                continue;
            }
            visible.push(CreaturePresentation {
                id: snapshot.id,
                kind: snapshot.kind,
                origin: Vec2::new((x - left) as f32, (y - bottom) as f32),
                size: Vec2::new(snapshot.width as f32, snapshot.height as f32),
                color: body_color(snapshot),
                sprite_index: snapshot.sprite_index,
                facing: snapshot.facing,
                health: health_fraction(snapshot),
            });
        }

        Ok(Self {
            viewport,
            tiles,
            creatures: visible,
            outcome,
        })
    }
}
