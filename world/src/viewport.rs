//! Visible-window tracking.

use grotto_core::ViewportSnapshot;

use crate::collision::PixelBox;

/// Pixels kept between the tracked body and the window edge when the world
/// leaves room for it.
const TRACK_MARGIN: i64 = 40;

/// The rectangle of the world a presentation layer should show.
///
/// The window follows the player, keeping a margin on every side where the
/// world is large enough, and clamps to the world bounds otherwise. Tracking
/// is pure bookkeeping; nothing in the simulation reads it back.
#[derive(Clone, Debug)]
pub(crate) struct Viewport {
    width: u32,
    height: u32,
    left: i64,
    bottom: i64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 200,
            height: 150,
            left: 0,
            bottom: 0,
        }
    }
}

impl Viewport {
    /// Resizes the window, keeping its anchor.
    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Re-anchors the window around `focus` inside a world of the given
    /// pixel dimensions.
    pub(crate) fn track(&mut self, focus: PixelBox, world_width: i64, world_height: i64) {
        self.left = track_axis(
            self.left,
            focus.left(),
            focus.right(),
            i64::from(self.width),
            world_width,
        );
        self.bottom = track_axis(
            self.bottom,
            focus.bottom(),
            focus.top(),
            i64::from(self.height),
            world_height,
        );
    }

    /// Returns the window as an owned snapshot.
    pub(crate) fn snapshot(&self) -> ViewportSnapshot {
        ViewportSnapshot {
            left: self.left,
            bottom: self.bottom,
            width: self.width,
            height: self.height,
        }
    }
}

fn track_axis(current: i64, span_lo: i64, span_hi: i64, window: i64, world: i64) -> i64 {
    let mut next = current;
    let margin_lo = span_lo - TRACK_MARGIN;
    let margin_hi = span_hi + TRACK_MARGIN + 1;

    if margin_hi - margin_lo > window {
        // Margins cannot both fit; center on the span instead.
        next = span_lo + (span_hi - span_lo + 1) / 2 - window / 2;
    } else {
        if next > margin_lo {
            next = margin_lo;
        }
        if next + window < margin_hi {
            next = margin_hi - window;
        }
    }

    next.clamp(0, (world - window).max(0))
}

#[cfg(test)]
mod tests {
    use super::Viewport;
    use crate::collision::PixelBox;

    #[test]
    fn window_clamps_to_world_bounds() {
        let mut viewport = Viewport::default();
        viewport.track(PixelBox::from_position(2.0, 2.0, 6, 12), 1000, 600);
        assert_eq!(viewport.snapshot().left, 0);
        assert_eq!(viewport.snapshot().bottom, 0);

        viewport.track(PixelBox::from_position(990.0, 590.0, 6, 12), 1000, 600);
        assert_eq!(viewport.snapshot().left, 800);
        assert_eq!(viewport.snapshot().bottom, 450);
    }

    #[test]
    fn window_keeps_the_margin_while_following() {
        let mut viewport = Viewport::default();
        viewport.track(PixelBox::from_position(400.0, 300.0, 6, 12), 1000, 600);

        let snapshot = viewport.snapshot();
        assert!(snapshot.left <= 400 - 40);
        assert!(snapshot.left + 200 >= 405 + 40 + 1);
        assert!(snapshot.bottom <= 300 - 40);
        assert!(snapshot.bottom + 150 >= 311 + 40 + 1);
    }

    #[test]
    fn small_worlds_pin_the_window_at_origin() {
        let mut viewport = Viewport::default();
        viewport.track(PixelBox::from_position(50.0, 40.0, 6, 12), 120, 90);
        assert_eq!(viewport.snapshot().left, 0);
        assert_eq!(viewport.snapshot().bottom, 0);
    }
}
