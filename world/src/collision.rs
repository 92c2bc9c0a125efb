//! Pixel-space collision geometry.
//!
//! Bodies collide through their displayed bounding boxes. A directional
//! collision requires an interior perimeter pixel of the moving body, corner
//! pixels excluded, to land inside an obstacle, so grazing a corner never
//! freezes an axis.

use grotto_core::Direction;

use crate::tiles::TileGrid;

/// Displayed bounding box of one body.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct PixelBox {
    left: i64,
    bottom: i64,
    width: i64,
    height: i64,
}

impl PixelBox {
    /// Builds the box of a body anchored at the continuous bottom-left
    /// position `(x, y)`.
    pub(crate) fn from_position(x: f64, y: f64, width: u32, height: u32) -> Self {
        Self {
            left: x.floor() as i64,
            bottom: y.floor() as i64,
            width: i64::from(width),
            height: i64::from(height),
        }
    }

    pub(crate) fn left(self) -> i64 {
        self.left
    }

    pub(crate) fn bottom(self) -> i64 {
        self.bottom
    }

    /// Rightmost pixel column still inside the body.
    pub(crate) fn right(self) -> i64 {
        self.left + self.width - 1
    }

    /// Topmost pixel row still inside the body.
    pub(crate) fn top(self) -> i64 {
        self.bottom + self.height - 1
    }

    pub(crate) fn width(self) -> i64 {
        self.width
    }

    pub(crate) fn height(self) -> i64 {
        self.height
    }

    /// Whether the boxes intersect on both axes.
    pub(crate) fn overlaps(self, other: Self) -> bool {
        self.left <= other.right()
            && other.left <= self.right()
            && self.bottom <= other.top()
            && other.bottom <= self.top()
    }

    /// Interior column span, corner columns excluded.
    fn interior_columns(self) -> Option<(i64, i64)> {
        if self.width < 3 {
            return None;
        }
        Some((self.left + 1, self.right() - 1))
    }

    /// Interior row span, corner rows excluded.
    fn interior_rows(self) -> Option<(i64, i64)> {
        if self.height < 3 {
            return None;
        }
        Some((self.bottom + 1, self.top() - 1))
    }

    /// Interior perimeter pixels on `side`, as a column and row span.
    fn perimeter(self, side: Direction) -> Option<((i64, i64), (i64, i64))> {
        match side {
            Direction::Down => {
                let columns = self.interior_columns()?;
                Some((columns, (self.bottom, self.bottom)))
            }
            Direction::Up => {
                let columns = self.interior_columns()?;
                Some((columns, (self.top(), self.top())))
            }
            Direction::Left => {
                let rows = self.interior_rows()?;
                Some(((self.left, self.left), rows))
            }
            Direction::Right => {
                let rows = self.interior_rows()?;
                Some(((self.right(), self.right()), rows))
            }
            Direction::Null => None,
        }
    }

    fn contains_span(self, columns: (i64, i64), rows: (i64, i64)) -> bool {
        columns.0 <= self.right()
            && self.left <= columns.1
            && rows.0 <= self.top()
            && self.bottom <= rows.1
    }
}

/// Whether the body collides with an impassable tile on `side`.
pub(crate) fn hits_tiles(body: PixelBox, side: Direction, grid: &TileGrid) -> bool {
    let Some((columns, rows)) = body.perimeter(side) else {
        return false;
    };
    grid.impassable_in_span(columns, rows)
}

/// Whether the body collides with `obstacle` on `side`.
pub(crate) fn hits_body(body: PixelBox, side: Direction, obstacle: PixelBox) -> bool {
    if !body.overlaps(obstacle) {
        return false;
    }
    let Some((columns, rows)) = body.perimeter(side) else {
        return false;
    };
    obstacle.contains_span(columns, rows)
}

/// Whether the body collides on `side` with any tile or obstacle.
pub(crate) fn blocked(
    body: PixelBox,
    side: Direction,
    grid: &TileGrid,
    obstacles: &[PixelBox],
) -> bool {
    hits_tiles(body, side, grid)
        || obstacles
            .iter()
            .any(|&obstacle| hits_body(body, side, obstacle))
}

/// Whether something solid occupies the pixel row just below the body.
pub(crate) fn supported(body: PixelBox, grid: &TileGrid, obstacles: &[PixelBox]) -> bool {
    let Some(columns) = body.interior_columns() else {
        return false;
    };
    let below = (body.bottom - 1, body.bottom - 1);

    grid.impassable_in_span(columns, below)
        || obstacles
            .iter()
            .any(|obstacle| obstacle.contains_span(columns, below))
}

/// Whether `upper` rests on `lower`, making their contact a landing rather
/// than a damaging one.
pub(crate) fn stands_on(upper: PixelBox, lower: PixelBox) -> bool {
    let Some(columns) = upper.interior_columns() else {
        return false;
    };
    let below = (upper.bottom - 1, upper.bottom - 1);
    lower.contains_span(columns, below)
}

#[cfg(test)]
mod tests {
    use super::{blocked, hits_body, hits_tiles, stands_on, supported, PixelBox};
    use grotto_core::{Direction, TerrainKind, TileCoord, TileGridConfig};

    use crate::tiles::TileGrid;

    fn grid_with_floor() -> TileGrid {
        // 4x3 tiles of 8px; the bottom row is solid ground.
        let mut grid = TileGrid::new(TileGridConfig::new(4, 3, 8));
        for column in 0..4 {
            grid.set_terrain(TileCoord::new(column, 0), TerrainKind::Ground)
                .expect("terrain");
        }
        grid
    }

    #[test]
    fn boxes_overlap_on_shared_pixels() {
        let body = PixelBox::from_position(10.0, 10.0, 6, 12);
        assert!(body.overlaps(PixelBox::from_position(15.0, 21.0, 6, 12)));
        assert!(!body.overlaps(PixelBox::from_position(16.0, 10.0, 6, 12)));
        assert!(!body.overlaps(PixelBox::from_position(10.0, 22.0, 6, 12)));
    }

    #[test]
    fn corner_contact_is_not_a_directional_hit() {
        let body = PixelBox::from_position(10.0, 10.0, 6, 6);
        // Obstacle touching only the bottom-left corner pixel.
        let corner = PixelBox::from_position(5.0, 5.0, 6, 6);

        assert!(body.overlaps(corner));
        assert!(!hits_body(body, Direction::Down, corner));
        assert!(!hits_body(body, Direction::Left, corner));
    }

    #[test]
    fn side_probes_find_flush_obstacles() {
        let body = PixelBox::from_position(10.0, 10.0, 6, 12);
        let underfoot = PixelBox::from_position(8.0, 2.0, 10, 9);
        assert!(hits_body(body, Direction::Down, underfoot));
        assert!(!hits_body(body, Direction::Up, underfoot));

        let wall = PixelBox::from_position(15.0, 12.0, 4, 4);
        assert!(hits_body(body, Direction::Right, wall));
        assert!(!hits_body(body, Direction::Left, wall));
    }

    #[test]
    fn tile_probes_respect_terrain() {
        let grid = grid_with_floor();
        // Body overlapping the solid bottom row.
        let sinking = PixelBox::from_position(4.0, 7.0, 6, 12);
        assert!(hits_tiles(sinking, Direction::Down, &grid));

        let resting = PixelBox::from_position(4.0, 8.0, 6, 12);
        assert!(!hits_tiles(resting, Direction::Down, &grid));
        assert!(blocked(sinking, Direction::Down, &grid, &[]));
    }

    #[test]
    fn support_probe_checks_the_row_below() {
        let grid = grid_with_floor();
        let resting = PixelBox::from_position(4.0, 8.0, 6, 12);
        assert!(supported(resting, &grid, &[]));

        let hovering = PixelBox::from_position(4.0, 9.0, 6, 12);
        assert!(!supported(hovering, &grid, &[]));

        let carrier = PixelBox::from_position(2.0, 1.0, 10, 8);
        let carried = PixelBox::from_position(4.0, 9.0, 6, 12);
        assert!(supported(carried, &grid, &[carrier]));
        assert!(stands_on(carried, carrier));
        assert!(!stands_on(carrier, carried));
    }
}
