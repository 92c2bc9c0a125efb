//! Damage rules: the contact matrix and the per-terrain exposure costs.

use grotto_core::{EntityKind, TerrainKind};

/// Hit points a player gains by consuming a plant, and the headroom the
/// player must have for the consumption to happen at all.
pub(crate) const NOURISH_HIT_POINTS: u32 = 50;

/// Hit points every schoolmate loses when a crawler takes contact damage.
pub(crate) const SCHOOL_LEVY: u32 = 1;

/// Contact damage dealt by `attacker` to `defender` per exchange.
///
/// The matrix is deliberately asymmetric: crawlers bite players harder than
/// players stomp crawlers, and swimmers shrug crawlers off entirely. Plants
/// deal and take nothing here; consumption is its own rule.
pub(crate) fn contact_damage(attacker: EntityKind, defender: EntityKind) -> u32 {
    use EntityKind::{Crawler, Plant, Player, Rival, Swimmer};

    match (attacker, defender) {
        (Player | Rival, Swimmer) => 50,
        (Swimmer, Player | Rival) => 50,
        (Player | Rival, Crawler) => 30,
        (Crawler, Player | Rival) => 50,
        (Swimmer, Crawler) => 30,
        (Crawler, Swimmer) => 0,
        (Plant, _) | (_, Plant) => 0,
        (Player | Rival, Player | Rival) => 0,
        (Swimmer, Swimmer) | (Crawler, Crawler) => 0,
    }
}

/// Hit-point cost `kind` pays per completed 0.2 s of continuous overlap with
/// `terrain`, or `None` when the terrain is harmless to it.
pub(crate) fn terrain_cost(kind: EntityKind, terrain: TerrainKind) -> Option<u32> {
    use EntityKind::{Crawler, Plant, Player, Rival, Swimmer};

    match (kind, terrain) {
        (Player | Rival | Crawler, TerrainKind::Water) => Some(2),
        (Player | Rival | Crawler | Swimmer, TerrainKind::Magma) => Some(50),
        // A swimmer out of water suffocates.
        (Swimmer, TerrainKind::Air) => Some(6),
        (Plant, _) => None,
        _ => None,
    }
}
