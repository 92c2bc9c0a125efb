#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic run accounting folded from the event stream.

use std::time::Duration;

use grotto_core::{Event, GameOutcome, HitPointCause};

/// Pure system that folds world events into a running account of the run.
///
/// Feed it every event batch the world emits, in order, and ask for the
/// [`RunReport`] whenever a summary is wanted. Folding the same stream twice
/// yields byte-equal reports.
#[derive(Debug)]
pub struct Analytics {
    ticks: u64,
    simulated: Duration,
    spawns: u32,
    contact_damage: u64,
    terrain_damage: u64,
    school_damage: u64,
    boundary_damage: u64,
    hit_points_restored: u64,
    deaths: u32,
    terminations: u32,
    merges: u32,
    outcome: GameOutcome,
}

impl Analytics {
    /// Creates an empty account.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ticks: 0,
            simulated: Duration::ZERO,
            spawns: 0,
            contact_damage: 0,
            terrain_damage: 0,
            school_damage: 0,
            boundary_damage: 0,
            hit_points_restored: 0,
            deaths: 0,
            terminations: 0,
            merges: 0,
            outcome: GameOutcome::InProgress,
        }
    }

    /// Folds one batch of events into the account.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    self.ticks += 1;
                    self.simulated = self.simulated.saturating_add(*dt);
                }
                Event::CreatureSpawned { .. } => self.spawns += 1,
                Event::HitPointsChanged {
                    before,
                    after,
                    cause,
                    ..
                } => self.record_change(before.get(), after.get(), *cause),
                Event::CreatureDied { .. } => self.deaths += 1,
                Event::CreatureTerminated { .. } => self.terminations += 1,
                Event::SchoolsMerged { .. } => self.merges += 1,
                Event::OutcomeChanged { outcome } => self.outcome = *outcome,
                Event::WorldStarted => {}
            }
        }
    }

    /// Returns the account folded so far.
    #[must_use]
    pub const fn report(&self) -> RunReport {
        RunReport {
            ticks: self.ticks,
            simulated: self.simulated,
            spawns: self.spawns,
            contact_damage: self.contact_damage,
            terrain_damage: self.terrain_damage,
            school_damage: self.school_damage,
            boundary_damage: self.boundary_damage,
            hit_points_restored: self.hit_points_restored,
            deaths: self.deaths,
            terminations: self.terminations,
            merges: self.merges,
            outcome: self.outcome,
        }
    }

    fn record_change(&mut self, before: u32, after: u32, cause: HitPointCause) {
        if after > before {
            self.hit_points_restored += u64::from(after - before);
            return;
        }
        let loss = u64::from(before - after);
        match cause {
            HitPointCause::Contact(_) => self.contact_damage += loss,
            HitPointCause::Terrain(_) => self.terrain_damage += loss,
            HitPointCause::SchoolLevy | HitPointCause::SchoolTransfer => {
                self.school_damage += loss;
            }
            HitPointCause::OutOfBounds => self.boundary_damage += loss,
            HitPointCause::Nourished => {}
        }
    }
}

impl Default for Analytics {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate account of a run at one point in time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RunReport {
    ticks: u64,
    simulated: Duration,
    spawns: u32,
    contact_damage: u64,
    terrain_damage: u64,
    school_damage: u64,
    boundary_damage: u64,
    hit_points_restored: u64,
    deaths: u32,
    terminations: u32,
    merges: u32,
    outcome: GameOutcome,
}

impl RunReport {
    /// Ticks the world has advanced.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Total simulated time across those ticks.
    #[must_use]
    pub const fn simulated(&self) -> Duration {
        self.simulated
    }

    /// Creatures spawned over the run.
    #[must_use]
    pub const fn spawns(&self) -> u32 {
        self.spawns
    }

    /// Hit points lost to creature contact.
    #[must_use]
    pub const fn contact_damage(&self) -> u64 {
        self.contact_damage
    }

    /// Hit points lost to damaging terrain.
    #[must_use]
    pub const fn terrain_damage(&self) -> u64 {
        self.terrain_damage
    }

    /// Hit points lost to school levies and transfers.
    #[must_use]
    pub const fn school_damage(&self) -> u64 {
        self.school_damage
    }

    /// Hit points forfeited by leaving the world bounds.
    #[must_use]
    pub const fn boundary_damage(&self) -> u64 {
        self.boundary_damage
    }

    /// Hit points lost to every cause combined.
    #[must_use]
    pub const fn total_damage(&self) -> u64 {
        self.contact_damage + self.terrain_damage + self.school_damage + self.boundary_damage
    }

    /// Hit points gained back through plants and transfers.
    #[must_use]
    pub const fn hit_points_restored(&self) -> u64 {
        self.hit_points_restored
    }

    /// Creatures whose hit points reached zero.
    #[must_use]
    pub const fn deaths(&self) -> u32 {
        self.deaths
    }

    /// Creatures removed from the world.
    #[must_use]
    pub const fn terminations(&self) -> u32 {
        self.terminations
    }

    /// School merges observed.
    #[must_use]
    pub const fn merges(&self) -> u32 {
        self.merges
    }

    /// The most recently announced run outcome.
    #[must_use]
    pub const fn outcome(&self) -> GameOutcome {
        self.outcome
    }
}
