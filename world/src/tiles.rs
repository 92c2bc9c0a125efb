//! Tile grid owned by the world.

use grotto_core::{TerrainKind, TileCoord, TileGridConfig, WorldError};

/// Fixed-size terrain matrix with one optional target tile.
///
/// Terrain is stored row-major from the bottom row. The grid's pixel extent
/// is `columns * tile_length` by `rows * tile_length`; pixel coordinates
/// outside that extent belong to no tile.
#[derive(Clone, Debug)]
pub struct TileGrid {
    config: TileGridConfig,
    terrain: Vec<TerrainKind>,
    target: Option<TileCoord>,
}

impl TileGrid {
    /// Creates an all-air grid of the given dimensions.
    #[must_use]
    pub(crate) fn new(config: TileGridConfig) -> Self {
        let cells = usize::try_from(config.columns())
            .ok()
            .and_then(|columns| usize::try_from(config.rows()).ok().map(|rows| (columns, rows)))
            .and_then(|(columns, rows)| columns.checked_mul(rows))
            .unwrap_or(0);

        Self {
            config,
            terrain: vec![TerrainKind::Air; cells],
            target: None,
        }
    }

    /// Returns the grid dimensions.
    #[must_use]
    pub fn config(&self) -> TileGridConfig {
        self.config
    }

    /// Returns the terrain cells, row-major from the bottom row.
    #[must_use]
    pub fn terrain(&self) -> &[TerrainKind] {
        &self.terrain
    }

    /// Returns the terrain of `tile`, or `None` outside the grid.
    #[must_use]
    pub fn terrain_at(&self, tile: TileCoord) -> Option<TerrainKind> {
        self.index(tile).map(|index| self.terrain[index])
    }

    /// Returns the designated target tile, if any.
    #[must_use]
    pub fn target(&self) -> Option<TileCoord> {
        self.target
    }

    /// Reclassifies the terrain of `tile`.
    pub(crate) fn set_terrain(
        &mut self,
        tile: TileCoord,
        terrain: TerrainKind,
    ) -> Result<(), WorldError> {
        let index = self.index(tile).ok_or(WorldError::InvalidTile { tile })?;
        self.terrain[index] = terrain;
        Ok(())
    }

    /// Marks `tile` as the level target.
    pub(crate) fn mark_target(&mut self, tile: TileCoord) -> Result<(), WorldError> {
        if self.index(tile).is_none() {
            return Err(WorldError::InvalidTile { tile });
        }
        self.target = Some(tile);
        Ok(())
    }

    /// Whether any impassable tile intersects the pixel span.
    #[must_use]
    pub(crate) fn impassable_in_span(&self, columns: (i64, i64), rows: (i64, i64)) -> bool {
        self.terrain_in_span(columns, rows, |terrain| !terrain.is_passable())
    }

    /// Whether any tile of `terrain` intersects the pixel span.
    #[must_use]
    pub(crate) fn terrain_overlaps_span(
        &self,
        terrain: TerrainKind,
        columns: (i64, i64),
        rows: (i64, i64),
    ) -> bool {
        self.terrain_in_span(columns, rows, |cell| cell == terrain)
    }

    /// Whether the target tile intersects the pixel span.
    #[must_use]
    pub(crate) fn target_in_span(&self, columns: (i64, i64), rows: (i64, i64)) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        let Some((first_column, last_column)) = self.tile_axis_range(columns, self.config.columns())
        else {
            return false;
        };
        let Some((first_row, last_row)) = self.tile_axis_range(rows, self.config.rows()) else {
            return false;
        };

        (first_column..=last_column).contains(&target.column())
            && (first_row..=last_row).contains(&target.row())
    }

    /// Returns the tile containing the pixel, or `None` outside the grid.
    #[must_use]
    pub(crate) fn tile_at_pixel(&self, x: i64, y: i64) -> Option<TileCoord> {
        let (column, _) = self.tile_axis_range((x, x), self.config.columns())?;
        let (row, _) = self.tile_axis_range((y, y), self.config.rows())?;
        Some(TileCoord::new(column, row))
    }

    fn terrain_in_span<F>(&self, columns: (i64, i64), rows: (i64, i64), matches: F) -> bool
    where
        F: Fn(TerrainKind) -> bool,
    {
        let Some((first_column, last_column)) = self.tile_axis_range(columns, self.config.columns())
        else {
            return false;
        };
        let Some((first_row, last_row)) = self.tile_axis_range(rows, self.config.rows()) else {
            return false;
        };

        for row in first_row..=last_row {
            for column in first_column..=last_column {
                let Some(index) = self.index(TileCoord::new(column, row)) else {
                    continue;
                };
                if matches(self.terrain[index]) {
                    return true;
                }
            }
        }

        false
    }

    /// Maps an inclusive pixel range onto tile indices along one axis,
    /// clamped to the grid; `None` when the range misses the grid entirely.
    fn tile_axis_range(&self, span: (i64, i64), limit: u32) -> Option<(u32, u32)> {
        let (lo, hi) = span;
        let length = i64::from(self.config.tile_length());
        if length == 0 || hi < lo || hi < 0 || limit == 0 {
            return None;
        }

        let first = lo.max(0) / length;
        let last = hi / length;
        if first >= i64::from(limit) {
            return None;
        }

        let last = last.min(i64::from(limit) - 1);
        let first = u32::try_from(first).ok()?;
        let last = u32::try_from(last).ok()?;
        Some((first, last))
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        if tile.column() >= self.config.columns() || tile.row() >= self.config.rows() {
            return None;
        }

        let row = usize::try_from(tile.row()).ok()?;
        let column = usize::try_from(tile.column()).ok()?;
        let columns = usize::try_from(self.config.columns()).ok()?;
        row.checked_mul(columns)?.checked_add(column)
    }
}
