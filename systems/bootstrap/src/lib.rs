#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Grotto experience.

use grotto_core::{TerrainView, ViewportSnapshot};
use grotto_world::{query, Creature, World};

/// Produces data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Exposes the terrain layout required for rendering.
    #[must_use]
    pub fn terrain<'world>(&self, world: &'world World) -> TerrainView<'world> {
        query::terrain_view(world)
    }

    /// Exposes the creatures currently inhabiting the world for presentation purposes.
    #[must_use]
    pub fn creatures<'world>(&self, world: &'world World) -> &'world [Creature] {
        query::creatures(world)
    }

    /// Exposes the visible-window rectangle for presentation purposes.
    #[must_use]
    pub fn viewport(&self, world: &World) -> ViewportSnapshot {
        query::viewport(world)
    }
}
