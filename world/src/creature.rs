//! Creature state: kind constants, kinematic state, timers, and the
//! movement/duck/jump state machine.

use grotto_core::{
    Direction, EntityId, EntityKind, HitPoints, Position, SchoolId, TerrainKind,
    DEATH_GRACE_SECONDS, IMMUNITY_WINDOW_SECONDS, SPRITE_FRAME_SECONDS,
    TERRAIN_DAMAGE_PERIOD_SECONDS,
};

use crate::collision::PixelBox;
use crate::rng::SplitMix64;

/// Number of frames in the walk cycle, starting at sprite index 3.
const WALK_FRAMES: u64 = 4;

/// Per-kind constants. One row per [`EntityKind`]; behaviour differences
/// between kinds reduce to this table plus the damage tables.
pub(crate) struct KindParams {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) ducked_height: Option<u32>,
    pub(crate) starting_hit_points: u32,
    pub(crate) max_hit_points: u32,
    pub(crate) initial_horizontal_speed: f64,
    pub(crate) max_horizontal_speed: f64,
    pub(crate) ducked_max_speed: Option<f64>,
    pub(crate) horizontal_acceleration: f64,
    pub(crate) jump_speed: Option<f64>,
    pub(crate) gravity: f64,
    pub(crate) action_period: Option<(f64, f64)>,
    pub(crate) blocking: bool,
    pub(crate) buoyant: bool,
}

const PLAYER_PARAMS: KindParams = KindParams {
    width: 6,
    height: 12,
    ducked_height: Some(7),
    starting_hit_points: 100,
    max_hit_points: 500,
    initial_horizontal_speed: 1.0,
    max_horizontal_speed: 3.0,
    ducked_max_speed: Some(1.0),
    horizontal_acceleration: 0.9,
    jump_speed: Some(8.0),
    gravity: 10.0,
    action_period: None,
    blocking: true,
    buoyant: false,
};

/// Returns the constant table row for `kind`.
pub(crate) const fn kind_params(kind: EntityKind) -> KindParams {
    match kind {
        EntityKind::Player => PLAYER_PARAMS,
        EntityKind::Rival => KindParams {
            starting_hit_points: 500,
            ..PLAYER_PARAMS
        },
        EntityKind::Swimmer => KindParams {
            width: 10,
            height: 5,
            ducked_height: None,
            starting_hit_points: 100,
            max_hit_points: 100,
            initial_horizontal_speed: 0.0,
            max_horizontal_speed: 4.0,
            ducked_max_speed: None,
            horizontal_acceleration: 1.5,
            jump_speed: None,
            gravity: 10.0,
            action_period: Some((1.0, 4.0)),
            blocking: true,
            buoyant: true,
        },
        EntityKind::Crawler => KindParams {
            width: 7,
            height: 5,
            ducked_height: None,
            starting_hit_points: 70,
            max_hit_points: 140,
            initial_horizontal_speed: 0.0,
            max_horizontal_speed: 2.5,
            ducked_max_speed: None,
            horizontal_acceleration: 0.7,
            jump_speed: None,
            gravity: 10.0,
            action_period: Some((2.0, 6.0)),
            blocking: true,
            buoyant: false,
        },
        EntityKind::Plant => KindParams {
            width: 6,
            height: 4,
            ducked_height: None,
            starting_hit_points: 1,
            max_hit_points: 1,
            initial_horizontal_speed: 0.0,
            max_horizontal_speed: 0.0,
            ducked_max_speed: None,
            horizontal_acceleration: 0.0,
            jump_speed: None,
            gravity: 0.0,
            action_period: None,
            blocking: false,
            buoyant: false,
        },
    }
}

/// Continuous exposure clock for one damaging terrain kind.
///
/// The clock accrues while the creature's box overlaps the terrain and fires
/// one charge per full damage period accrued. Leaving the terrain resets it,
/// so re-entering starts a fresh period before the next charge.
#[derive(Clone, Copy, Debug, Default)]
struct TerrainExposure {
    seconds: f64,
    charged: u64,
}

impl TerrainExposure {
    fn accrue(&mut self, dt: f64) -> u32 {
        self.seconds += dt;
        let total = (self.seconds / TERRAIN_DAMAGE_PERIOD_SECONDS) as u64;
        let fresh = total.saturating_sub(self.charged);
        self.charged = total;
        u32::try_from(fresh).unwrap_or(u32::MAX)
    }

    fn reset(&mut self) {
        self.seconds = 0.0;
        self.charged = 0;
    }
}

/// One simulated creature.
///
/// Horizontal and vertical motion are tracked as separate direction plus
/// non-negative magnitude pairs. Vertical acceleration always points down;
/// integration works on signed values and re-decomposes afterwards, which is
/// what flips a jump from Up to Down at its apex.
#[derive(Clone, Debug)]
pub struct Creature {
    id: EntityId,
    kind: EntityKind,
    x: f64,
    y: f64,
    facing: Direction,
    horizontal_direction: Direction,
    horizontal_speed: f64,
    vertical_direction: Direction,
    vertical_speed: f64,
    vertical_acceleration: f64,
    hit_points: HitPoints,
    immunity_seconds: f64,
    death_seconds: f64,
    animation_seconds: f64,
    ducking: bool,
    jumping: bool,
    doomed: bool,
    school: Option<SchoolId>,
    action_remaining: f64,
    rng: SplitMix64,
    exposure: [TerrainExposure; TerrainKind::ALL.len()],
}

impl Creature {
    /// Builds a freshly spawned creature at rest.
    ///
    /// The immunity stopwatch starts at zero, so a new creature is immune for
    /// its first window. Autonomous kinds draw their first heading on the
    /// first tick because the action countdown also starts at zero.
    pub(crate) fn spawn(
        id: EntityId,
        kind: EntityKind,
        position: Position,
        school: Option<SchoolId>,
        seed: u64,
    ) -> Self {
        let params = kind_params(kind);
        Self {
            id,
            kind,
            x: position.x(),
            y: position.y(),
            facing: Direction::Right,
            horizontal_direction: Direction::Null,
            horizontal_speed: 0.0,
            vertical_direction: Direction::Null,
            vertical_speed: 0.0,
            vertical_acceleration: 0.0,
            hit_points: HitPoints::new(params.starting_hit_points),
            immunity_seconds: 0.0,
            death_seconds: 0.0,
            animation_seconds: 0.0,
            ducking: false,
            jumping: false,
            doomed: false,
            school,
            action_remaining: 0.0,
            rng: SplitMix64::new(seed),
            exposure: [TerrainExposure::default(); TerrainKind::ALL.len()],
        }
    }

    /// Returns the creature's id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the creature's kind.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the continuous position of the bottom-left corner.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Returns the box width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        kind_params(self.kind).width
    }

    /// Returns the current box height in pixels, reduced while ducking.
    #[must_use]
    pub const fn height(&self) -> u32 {
        let params = kind_params(self.kind);
        if self.ducking {
            match params.ducked_height {
                Some(height) => height,
                None => params.height,
            }
        } else {
            params.height
        }
    }

    /// Returns the side the creature last headed towards.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Returns the current hit points.
    #[must_use]
    pub const fn hit_points(&self) -> HitPoints {
        self.hit_points
    }

    /// Returns the hit-point ceiling for this kind.
    #[must_use]
    pub const fn max_hit_points(&self) -> u32 {
        kind_params(self.kind).max_hit_points
    }

    /// Returns true while the creature has zero hit points.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.hit_points.is_zero()
    }

    /// Returns true while the post-damage immunity window is open.
    #[must_use]
    pub fn is_immune(&self) -> bool {
        self.immunity_seconds < IMMUNITY_WINDOW_SECONDS
    }

    /// Returns true while ducked.
    #[must_use]
    pub const fn is_ducking(&self) -> bool {
        self.ducking
    }

    /// Returns true while in vertical motion, rising or falling.
    #[must_use]
    pub fn is_airborne(&self) -> bool {
        self.vertical_direction != Direction::Null
    }

    /// Returns the sprite sheet index for the current pose.
    #[must_use]
    pub fn sprite_index(&self) -> u32 {
        if self.is_dead() {
            0
        } else if self.ducking {
            1
        } else if self.is_airborne() {
            2
        } else if self.horizontal_direction != Direction::Null {
            let frame = (self.animation_seconds / SPRITE_FRAME_SECONDS) as u64;
            3 + (frame % WALK_FRAMES) as u32
        } else {
            0
        }
    }

    /// Returns the school this creature belongs to, if any.
    #[must_use]
    pub const fn school(&self) -> Option<SchoolId> {
        self.school
    }

    pub(crate) fn set_school(&mut self, school: Option<SchoolId>) {
        self.school = school;
    }

    pub(crate) fn bbox(&self) -> PixelBox {
        PixelBox::from_position(self.x, self.y, self.width(), self.height())
    }

    pub(crate) fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub(crate) const fn standing_height(&self) -> u32 {
        kind_params(self.kind).height
    }

    pub(crate) const fn blocks(&self) -> bool {
        kind_params(self.kind).blocking
    }

    pub(crate) const fn is_buoyant(&self) -> bool {
        kind_params(self.kind).buoyant
    }

    pub(crate) const fn can_jump(&self) -> bool {
        kind_params(self.kind).jump_speed.is_some()
    }

    pub(crate) const fn can_duck(&self) -> bool {
        kind_params(self.kind).ducked_height.is_some()
    }

    pub(crate) const fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub(crate) const fn is_doomed(&self) -> bool {
        self.doomed
    }

    pub(crate) fn mark_doomed(&mut self) {
        self.doomed = true;
    }

    pub(crate) const fn horizontal_direction(&self) -> Direction {
        self.horizontal_direction
    }

    pub(crate) const fn vertical_direction(&self) -> Direction {
        self.vertical_direction
    }

    pub(crate) const fn horizontal_speed(&self) -> f64 {
        self.horizontal_speed
    }

    pub(crate) const fn vertical_speed(&self) -> f64 {
        self.vertical_speed
    }

    pub(crate) const fn vertical_acceleration(&self) -> f64 {
        self.vertical_acceleration
    }

    /// Horizontal acceleration magnitude, zero while not heading anywhere.
    pub(crate) fn horizontal_acceleration(&self) -> f64 {
        if self.horizontal_direction == Direction::Null {
            0.0
        } else {
            kind_params(self.kind).horizontal_acceleration
        }
    }

    pub(crate) fn lose_hit_points(&mut self, amount: u32) {
        self.hit_points = self.hit_points.lose(amount);
    }

    pub(crate) fn gain_hit_points(&mut self, amount: u32) {
        let max = HitPoints::new(self.max_hit_points());
        self.hit_points = self.hit_points.gain(amount, max);
    }

    pub(crate) fn reset_immunity(&mut self) {
        self.immunity_seconds = 0.0;
    }

    /// Starts heading towards `direction` from the kind's initial speed.
    pub(crate) fn start_move(&mut self, direction: Direction) {
        self.horizontal_direction = direction;
        self.facing = direction;
        self.horizontal_speed = kind_params(self.kind).initial_horizontal_speed;
        self.animation_seconds = 0.0;
    }

    /// Stops horizontal motion if currently heading towards `direction`.
    /// Releasing a direction the creature is not moving in does nothing.
    pub(crate) fn end_move(&mut self, direction: Direction) {
        if self.horizontal_direction == direction {
            self.halt_horizontal();
        }
    }

    pub(crate) fn halt_horizontal(&mut self) {
        self.horizontal_direction = Direction::Null;
        self.horizontal_speed = 0.0;
    }

    /// Launches a jump. The caller has checked the creature is grounded and
    /// the kind can jump at all.
    pub(crate) fn start_jump(&mut self) {
        let params = kind_params(self.kind);
        self.vertical_direction = Direction::Up;
        self.vertical_speed = match params.jump_speed {
            Some(speed) => speed,
            None => 0.0,
        };
        self.vertical_acceleration = params.gravity;
        self.jumping = true;
    }

    /// Releases the jump early, cutting the ascent short.
    pub(crate) fn end_jump(&mut self) {
        self.jumping = false;
        if self.vertical_direction == Direction::Up {
            self.vertical_speed = 0.0;
        }
    }

    pub(crate) fn start_duck(&mut self) {
        self.ducking = true;
    }

    /// Stands back up. The caller has checked the headroom.
    pub(crate) fn end_duck(&mut self) {
        self.ducking = false;
    }

    /// Clears the jump flag after a lateral hit while airborne. Upward speed
    /// is untouched; gravity finishes the arc.
    pub(crate) fn cancel_jump(&mut self) {
        self.jumping = false;
    }

    /// Comes to vertical rest on a surface.
    pub(crate) fn land(&mut self) {
        self.vertical_direction = Direction::Null;
        self.vertical_speed = 0.0;
        self.vertical_acceleration = 0.0;
        self.jumping = false;
    }

    /// Stops an ascent against a ceiling; gravity brings the creature down.
    pub(crate) fn bump_head(&mut self) {
        self.vertical_speed = 0.0;
        self.vertical_direction = Direction::Down;
    }

    /// Starts falling from rest after losing support.
    pub(crate) fn begin_fall(&mut self) {
        self.vertical_direction = Direction::Down;
        self.vertical_speed = 0.0;
        self.vertical_acceleration = kind_params(self.kind).gravity;
    }

    /// Pre-integration movement phase: autonomous kinds count down to their
    /// next steering decision, corpses stop walking.
    pub(crate) fn update_movement(&mut self, dt: f64) {
        if self.is_dead() {
            self.halt_horizontal();
            return;
        }
        if let Some((shortest, longest)) = kind_params(self.kind).action_period {
            self.action_remaining -= dt;
            if self.action_remaining <= 0.0 {
                let heading = if self.rng.next_u64() & 1 == 0 {
                    Direction::Left
                } else {
                    Direction::Right
                };
                // Carry the overshoot so the cadence stays fair across ticks.
                self.action_remaining += self.rng.sample_uniform(shortest, longest);
                self.start_move(heading);
            }
        }
    }

    /// Post-displacement velocity update for one sub-step of `t` seconds.
    pub(crate) fn update_velocities(&mut self, t: f64) {
        let params = kind_params(self.kind);

        if self.horizontal_direction != Direction::Null {
            let ceiling = if self.ducking {
                match params.ducked_max_speed {
                    Some(speed) => speed,
                    None => params.max_horizontal_speed,
                }
            } else {
                params.max_horizontal_speed
            };
            self.horizontal_speed =
                (self.horizontal_speed + params.horizontal_acceleration * t).min(ceiling);
        }

        if self.vertical_direction != Direction::Null {
            let signed =
                self.vertical_direction.factor() * self.vertical_speed - self.vertical_acceleration * t;
            if signed < 0.0 {
                self.vertical_direction = Direction::Down;
                self.vertical_speed = -signed;
            } else {
                self.vertical_direction = Direction::Up;
                self.vertical_speed = signed;
            }
        }
    }

    /// Advances the animation, immunity, and death stopwatches by `dt`.
    pub(crate) fn update_timers(&mut self, dt: f64) {
        self.animation_seconds += dt;
        self.immunity_seconds += dt;
        if self.is_dead() {
            self.death_seconds += dt;
        }
    }

    /// Returns true once the corpse has out-stayed the death grace delay.
    pub(crate) fn grace_expired(&self) -> bool {
        self.death_seconds > DEATH_GRACE_SECONDS
    }

    /// Adds `dt` of overlap with `terrain` and returns how many damage
    /// charges that completes.
    pub(crate) fn accrue_exposure(&mut self, terrain: TerrainKind, dt: f64) -> u32 {
        self.exposure[terrain.index()].accrue(dt)
    }

    /// Clears the exposure clock for `terrain` after the overlap ends.
    pub(crate) fn reset_exposure(&mut self, terrain: TerrainKind) {
        self.exposure[terrain.index()].reset();
    }
}
