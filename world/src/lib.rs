#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative Grotto simulation.
//!
//! The [`World`] owns the tile grid, every creature, and the school registry.
//! All mutation flows through [`apply`], which validates a [`Command`],
//! updates the state, and pushes the resulting [`Event`]s; all reads flow
//! through [`query`]. One `Tick` command advances every creature through the
//! movement, sub-stepped integration, timer, hit-point, and lifecycle phases
//! in a fixed order, so replaying a command sequence reproduces a run
//! exactly.

mod collision;
mod combat;
mod creature;
mod kinematics;
mod rng;
mod schools;
mod tiles;
mod viewport;

pub use creature::Creature;
pub use tiles::TileGrid;

use std::mem;
use std::time::Duration;

use grotto_core::{
    Command, CreatureAction, Direction, EntityId, EntityKind, Event, GameOutcome, HitPointCause,
    HitPoints, Position, SchoolId, TerrainKind, TileGridConfig, WorldError, MAX_TICK,
    WELCOME_BANNER,
};

use crate::collision::PixelBox;
use crate::rng::derive_creature_seed;
use crate::schools::SchoolRegistry;
use crate::viewport::Viewport;

/// Authoritative simulation state.
///
/// The creature list stays sorted by id: ids are handed out monotonically and
/// removal keeps the order, so lookups can binary-search. Scratch vectors for
/// the tick order, obstacle boxes, and schoolmate lists are kept on the world
/// and reused across ticks.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tile_grid: TileGrid,
    creatures: Vec<Creature>,
    schools: SchoolRegistry,
    player: Option<EntityId>,
    rival: Option<EntityId>,
    next_entity_id: u32,
    base_seed: u64,
    started: bool,
    outcome: GameOutcome,
    clock: Duration,
    viewport: Viewport,
    tick_order: Vec<EntityId>,
    obstacles: Vec<PixelBox>,
    mates: Vec<EntityId>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty, not-yet-started world with a small default grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            tile_grid: TileGrid::new(TileGridConfig::new(25, 19, 8)),
            creatures: Vec::new(),
            schools: SchoolRegistry::default(),
            player: None,
            rival: None,
            next_entity_id: 1,
            base_seed: 0,
            started: false,
            outcome: GameOutcome::InProgress,
            clock: Duration::ZERO,
            viewport: Viewport::default(),
            tick_order: Vec::new(),
            obstacles: Vec::new(),
            mates: Vec::new(),
        }
    }

    fn index_of(&self, entity: EntityId) -> Option<usize> {
        self.creatures
            .binary_search_by_key(&entity, |creature| creature.id())
            .ok()
    }

    fn reset_level(&mut self) {
        self.creatures.clear();
        self.schools.reset();
        self.player = None;
        self.rival = None;
        self.outcome = GameOutcome::InProgress;
        self.clock = Duration::ZERO;
    }
}

/// Executes `command` against `world`, pushing the resulting events.
///
/// Commands validate before they mutate: on an `Err` the world is unchanged
/// and `out_events` has not been touched.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), WorldError> {
    match command {
        Command::ConfigureTileGrid {
            columns,
            rows,
            tile_length,
        } => {
            if world.started {
                return Err(WorldError::StructureFrozen);
            }
            if columns == 0 || rows == 0 || tile_length == 0 {
                return Err(WorldError::InvalidTileLength);
            }
            world.tile_grid = TileGrid::new(TileGridConfig::new(columns, rows, tile_length));
            world.reset_level();
        }
        Command::SetTerrain { tile, terrain } => {
            if world.started {
                return Err(WorldError::StructureFrozen);
            }
            world.tile_grid.set_terrain(tile, terrain)?;
        }
        Command::MarkTarget { tile } => {
            if world.started {
                return Err(WorldError::StructureFrozen);
            }
            world.tile_grid.mark_target(tile)?;
        }
        Command::SeedRng { seed } => {
            if world.started {
                return Err(WorldError::StructureFrozen);
            }
            world.base_seed = seed;
        }
        Command::SpawnCreature {
            kind,
            position,
            school,
        } => spawn_creature(world, kind, position, school, out_events)?,
        Command::ConfigureViewport { width, height } => {
            world.viewport.resize(width, height);
        }
        Command::Start => {
            if world.started {
                return Err(WorldError::AlreadyStarted);
            }
            world.started = true;
            out_events.push(Event::WorldStarted);
        }
        Command::Tick { dt } => {
            if !world.started {
                return Err(WorldError::NotStarted);
            }
            if dt > MAX_TICK {
                return Err(WorldError::InvalidTickInterval { dt });
            }
            tick(world, dt, out_events);
        }
        Command::StartMove { entity, direction } => {
            if !direction.is_horizontal() {
                return Err(illegal(entity, CreatureAction::StartMove));
            }
            live_creature(world, entity, CreatureAction::StartMove)?.start_move(direction);
        }
        Command::EndMove { entity, direction } => {
            live_creature(world, entity, CreatureAction::EndMove)?.end_move(direction);
        }
        Command::StartJump { entity } => {
            let creature = live_creature(world, entity, CreatureAction::StartJump)?;
            if !creature.can_jump() || creature.is_airborne() {
                return Err(illegal(entity, CreatureAction::StartJump));
            }
            creature.start_jump();
        }
        Command::EndJump { entity } => {
            let creature = live_creature(world, entity, CreatureAction::EndJump)?;
            if !creature.is_jumping() {
                return Err(illegal(entity, CreatureAction::EndJump));
            }
            creature.end_jump();
        }
        Command::StartDuck { entity } => {
            let creature = live_creature(world, entity, CreatureAction::StartDuck)?;
            if !creature.can_duck() || creature.is_ducking() {
                return Err(illegal(entity, CreatureAction::StartDuck));
            }
            creature.start_duck();
        }
        Command::EndDuck { entity } => end_duck(world, entity)?,
    }

    Ok(())
}

const fn illegal(entity: EntityId, action: CreatureAction) -> WorldError {
    WorldError::IllegalAction { entity, action }
}

fn live_creature(
    world: &mut World,
    entity: EntityId,
    action: CreatureAction,
) -> Result<&mut Creature, WorldError> {
    let index = world
        .index_of(entity)
        .ok_or(WorldError::UnknownEntity { entity })?;
    let creature = &mut world.creatures[index];
    if creature.is_dead() {
        return Err(illegal(entity, action));
    }
    Ok(creature)
}

fn spawn_creature(
    world: &mut World,
    kind: EntityKind,
    position: Position,
    school: Option<SchoolId>,
    out_events: &mut Vec<Event>,
) -> Result<(), WorldError> {
    if world.started {
        return Err(WorldError::StructureFrozen);
    }
    match kind {
        EntityKind::Player if world.player.is_some() => {
            return Err(WorldError::PlayerAlreadyPresent { kind });
        }
        EntityKind::Rival if world.rival.is_some() => {
            return Err(WorldError::PlayerAlreadyPresent { kind });
        }
        _ => {}
    }
    if school.is_some() && kind != EntityKind::Crawler {
        return Err(WorldError::SchoolKindMismatch { kind });
    }
    if let Some(school) = school {
        if !world.schools.contains(school) {
            return Err(WorldError::UnknownSchool { school });
        }
    }

    let config = world.tile_grid.config();
    let in_bounds = position.x().is_finite()
        && position.y().is_finite()
        && position.x() >= 0.0
        && position.x() < config.width_px() as f64
        && position.y() >= 0.0
        && position.y() < config.height_px() as f64;
    if !in_bounds {
        return Err(WorldError::InvalidPosition {
            x: position.x(),
            y: position.y(),
        });
    }

    let entity = EntityId::new(world.next_entity_id);
    world.next_entity_id = world.next_entity_id.wrapping_add(1);

    let school = if kind == EntityKind::Crawler {
        let school = match school {
            Some(existing) => existing,
            None => world.schools.create(),
        };
        world.schools.join(school, entity);
        Some(school)
    } else {
        None
    };

    let seed = derive_creature_seed(world.base_seed, entity);
    world
        .creatures
        .push(Creature::spawn(entity, kind, position, school, seed));
    match kind {
        EntityKind::Player => world.player = Some(entity),
        EntityKind::Rival => world.rival = Some(entity),
        _ => {}
    }

    out_events.push(Event::CreatureSpawned {
        entity,
        kind,
        school,
    });
    Ok(())
}

fn end_duck(world: &mut World, entity: EntityId) -> Result<(), WorldError> {
    let index = world
        .index_of(entity)
        .ok_or(WorldError::UnknownEntity { entity })?;
    let creature = &world.creatures[index];
    if creature.is_dead() || !creature.is_ducking() {
        return Err(illegal(entity, CreatureAction::EndDuck));
    }

    // Standing back up needs the full-height box to be clear of terrain and
    // of every blocking body.
    let standing = PixelBox::from_position(
        creature.position().x(),
        creature.position().y(),
        creature.width(),
        creature.standing_height(),
    );
    let tiles_block = world.tile_grid.impassable_in_span(
        (standing.left(), standing.right()),
        (standing.bottom(), standing.top()),
    );
    let bodies_block = world.creatures.iter().any(|other| {
        other.id() != entity && other.blocks() && standing.overlaps(other.bbox())
    });
    if tiles_block || bodies_block {
        return Err(illegal(entity, CreatureAction::EndDuck));
    }

    world.creatures[index].end_duck();
    Ok(())
}

fn tick(world: &mut World, dt: Duration, out_events: &mut Vec<Event>) {
    world.clock = world.clock.saturating_add(dt);
    out_events.push(Event::TimeAdvanced { dt });

    let seconds = dt.as_secs_f64();

    // Id snapshot in step order: player, rival, then everyone else. Creatures
    // terminating mid-tick simply drop out of the remaining lookups.
    let mut order = mem::take(&mut world.tick_order);
    order.clear();
    if let Some(player) = world.player {
        order.push(player);
    }
    if let Some(rival) = world.rival {
        order.push(rival);
    }
    for creature in &world.creatures {
        let id = creature.id();
        if world.player != Some(id) && world.rival != Some(id) {
            order.push(id);
        }
    }

    for &entity in &order {
        let Some(index) = world.index_of(entity) else {
            continue;
        };
        advance_creature(world, index, seconds, out_events);

        if world.player == Some(entity) {
            after_player_step(world, entity, out_events);
        }
    }

    world.tick_order = order;
}

/// Viewport recentering and the win check, both anchored to the player's
/// freshly advanced box.
fn after_player_step(world: &mut World, player: EntityId, out_events: &mut Vec<Event>) {
    let Some(index) = world.index_of(player) else {
        return;
    };
    let body = world.creatures[index].bbox();
    let config = world.tile_grid.config();
    world
        .viewport
        .track(body, config.width_px(), config.height_px());

    if world.outcome == GameOutcome::InProgress
        && !world.creatures[index].is_dead()
        && world
            .tile_grid
            .target_in_span((body.left(), body.right()), (body.bottom(), body.top()))
    {
        world.outcome = GameOutcome::Won;
        out_events.push(Event::OutcomeChanged {
            outcome: GameOutcome::Won,
        });
    }
}

fn advance_creature(world: &mut World, index: usize, dt: f64, out_events: &mut Vec<Event>) {
    world.creatures[index].update_movement(dt);

    let creature = &world.creatures[index];
    let advancing = creature.id();
    let steps = kinematics::sub_step_count(
        dt,
        creature.horizontal_speed(),
        creature.horizontal_acceleration(),
        creature.vertical_speed(),
        creature.vertical_acceleration(),
    );
    let step = dt / f64::from(steps);

    // Everyone else's box is frozen for the whole of this creature's advance.
    let mut obstacles = mem::take(&mut world.obstacles);
    obstacles.clear();
    for other in &world.creatures {
        if other.id() != advancing && other.blocks() {
            obstacles.push(other.bbox());
        }
    }

    for _ in 0..steps {
        integrate_step(
            &world.tile_grid,
            &mut world.creatures[index],
            &obstacles,
            step,
            out_events,
        );
        if world.creatures[index].is_doomed() {
            break;
        }
    }

    obstacles.clear();
    world.obstacles = obstacles;

    world.creatures[index].update_timers(dt);
    update_hit_points(world, index, dt, out_events);
    lifecycle(world, index, out_events);
}

/// One sub-step: closed-form integration on both axes, the world-bounds
/// checks, directional resolution against tiles then bodies, the falling
/// transition, and the velocity update.
fn integrate_step(
    grid: &TileGrid,
    creature: &mut Creature,
    obstacles: &[PixelBox],
    t: f64,
    out_events: &mut Vec<Event>,
) {
    let start = creature.position();
    let horizontal = creature.horizontal_direction();
    let vertical = creature.vertical_direction();

    let dx = kinematics::displacement(
        horizontal.factor() * creature.horizontal_speed(),
        horizontal.factor() * creature.horizontal_acceleration(),
        t,
    );
    let dy = kinematics::displacement(
        vertical.factor() * creature.vertical_speed(),
        -creature.vertical_acceleration(),
        t,
    );

    let mut next_x = start.x() + dx;
    let mut next_y = start.y() + dy;

    // The world bottom is solid: a candidate below it rests on it.
    if next_y < 0.0 {
        next_y = 0.0;
        creature.land();
    }

    let config = grid.config();
    if next_x < 0.0 || next_x >= config.width_px() as f64 || next_y >= config.height_px() as f64 {
        doom(creature, out_events);
        return;
    }

    // Vertical axis, tiles and bodies together, with x held at the pre-step
    // value so the axes resolve independently.
    let vertical = creature.vertical_direction();
    if vertical != Direction::Null {
        let candidate =
            PixelBox::from_position(start.x(), next_y, creature.width(), creature.height());
        if collision::blocked(candidate, vertical, grid, obstacles) {
            next_y = start.y();
            if vertical == Direction::Down {
                creature.land();
            } else {
                creature.bump_head();
            }
        }
    }

    if horizontal != Direction::Null {
        let candidate =
            PixelBox::from_position(next_x, next_y, creature.width(), creature.height());
        if collision::blocked(candidate, horizontal, grid, obstacles) {
            next_x = start.x();
            let airborne = creature.is_airborne();
            creature.halt_horizontal();
            if airborne && creature.is_jumping() {
                creature.cancel_jump();
            }
        }
    }

    creature.set_position(next_x, next_y);

    // A creature at vertical rest starts falling once nothing holds it up.
    // Buoyant kinds first check whether they are submerged; the world bottom
    // row counts as support.
    if !creature.is_airborne() {
        let body = creature.bbox();
        let submerged = creature.is_buoyant() && {
            let centre_x = body.left() + body.width() / 2;
            let centre_y = body.bottom() + body.height() / 2;
            grid.tile_at_pixel(centre_x, centre_y)
                .and_then(|tile| grid.terrain_at(tile))
                == Some(TerrainKind::Water)
        };
        if !submerged && body.bottom() > 0 && !collision::supported(body, grid, obstacles) {
            creature.begin_fall();
        }
    }

    creature.update_velocities(t);
}

/// Kills and schedules termination for a creature whose integrated position
/// left the world. The failure never surfaces as an error.
fn doom(creature: &mut Creature, out_events: &mut Vec<Event>) {
    let before = creature.hit_points();
    if !before.is_zero() {
        creature.lose_hit_points(before.get());
        out_events.push(Event::HitPointsChanged {
            entity: creature.id(),
            before,
            after: HitPoints::ZERO,
            cause: HitPointCause::OutOfBounds,
        });
        out_events.push(Event::CreatureDied {
            entity: creature.id(),
        });
    }
    creature.mark_doomed();
}

enum HitPointChange {
    Gain(u32),
    Lose(u32),
}

/// Applies one clamped hit-point change and emits the bookkeeping events.
/// Dead creatures are inert: the change is dropped.
fn change_hit_points(
    world: &mut World,
    index: usize,
    change: HitPointChange,
    cause: HitPointCause,
    out_events: &mut Vec<Event>,
) {
    let creature = &mut world.creatures[index];
    let before = creature.hit_points();
    if before.is_zero() {
        return;
    }
    match change {
        HitPointChange::Gain(amount) => creature.gain_hit_points(amount),
        HitPointChange::Lose(amount) => creature.lose_hit_points(amount),
    }
    let after = creature.hit_points();
    if after == before {
        return;
    }
    out_events.push(Event::HitPointsChanged {
        entity: creature.id(),
        before,
        after,
        cause,
    });
    if after.is_zero() {
        out_events.push(Event::CreatureDied {
            entity: creature.id(),
        });
    }
}

/// Hit-point phase for one advanced creature: terrain exposure, school
/// merges, pairwise contact damage, then nourishment. A corpse skips the
/// whole phase, and death inside one stage skips the stages after it.
fn update_hit_points(world: &mut World, index: usize, dt: f64, out_events: &mut Vec<Event>) {
    if world.creatures[index].is_dead() {
        return;
    }
    terrain_damage(world, index, dt, out_events);
    if world.creatures[index].is_dead() {
        return;
    }
    school_merges(world, index, out_events);
    if world.creatures[index].is_dead() {
        return;
    }
    contact_phase(world, index, out_events);
    if world.creatures[index].is_dead() {
        return;
    }
    nourish(world, index, out_events);
}

fn terrain_damage(world: &mut World, index: usize, dt: f64, out_events: &mut Vec<Event>) {
    let kind = world.creatures[index].kind();
    let body = world.creatures[index].bbox();
    let columns = (body.left(), body.right());
    let rows = (body.bottom(), body.top());

    for terrain in TerrainKind::ALL {
        let Some(cost) = combat::terrain_cost(kind, terrain) else {
            continue;
        };
        if world.tile_grid.terrain_overlaps_span(terrain, columns, rows) {
            let charges = world.creatures[index].accrue_exposure(terrain, dt);
            if charges > 0 {
                change_hit_points(
                    world,
                    index,
                    HitPointChange::Lose(cost.saturating_mul(charges)),
                    HitPointCause::Terrain(terrain),
                    out_events,
                );
            }
        } else {
            world.creatures[index].reset_exposure(terrain);
        }
    }
}

/// Merges schools when the advancing crawler overlaps a live crawler of a
/// differently-sized school. The member of the smaller school moves into the
/// larger one; the redistribution arithmetic is applied exactly as stated in
/// the merge rule, clamping included.
fn school_merges(world: &mut World, index: usize, out_events: &mut Vec<Event>) {
    if world.creatures[index].kind() != EntityKind::Crawler {
        return;
    }
    let advancing = world.creatures[index].id();
    let body = world.creatures[index].bbox();

    for partner_index in 0..world.creatures.len() {
        if partner_index == index {
            continue;
        }
        let Some(own_school) = world.creatures[index].school() else {
            return;
        };
        let partner = &world.creatures[partner_index];
        if partner.kind() != EntityKind::Crawler || partner.is_dead() {
            continue;
        }
        let Some(partner_school) = partner.school() else {
            continue;
        };
        if partner_school == own_school || !body.overlaps(partner.bbox()) {
            continue;
        }

        let own_size = world.schools.size(own_school);
        let partner_size = world.schools.size(partner_school);
        if own_size == partner_size {
            continue;
        }
        if own_size < partner_size {
            transfer(world, index, own_school, partner_school, out_events);
        } else {
            let partner_id = world.creatures[partner_index].id();
            transfer(world, partner_index, partner_school, own_school, out_events);
            debug_assert_ne!(partner_id, advancing);
        }
    }
}

/// Moves one crawler from its school into a larger one, applying the four
/// redistribution steps in order: old mates gain one, the mover is adjusted
/// by (1 - old size) + new size, membership switches, new mates lose one.
fn transfer(
    world: &mut World,
    mover_index: usize,
    from: SchoolId,
    into: SchoolId,
    out_events: &mut Vec<Event>,
) {
    let mover = world.creatures[mover_index].id();
    let old_size = world.schools.size(from);
    let new_size = world.schools.size(into);

    let mut mates = mem::take(&mut world.mates);
    world.schools.mates(from, mover, &mut mates);
    for index in 0..mates.len() {
        if let Some(mate_index) = world.index_of(mates[index]) {
            change_hit_points(
                world,
                mate_index,
                HitPointChange::Gain(1),
                HitPointCause::SchoolTransfer,
                out_events,
            );
        }
    }

    let delta = 1 - old_size as i64 + new_size as i64;
    let change = if delta >= 0 {
        HitPointChange::Gain(u32::try_from(delta).unwrap_or(u32::MAX))
    } else {
        HitPointChange::Lose(u32::try_from(-delta).unwrap_or(u32::MAX))
    };
    change_hit_points(
        world,
        mover_index,
        change,
        HitPointCause::SchoolTransfer,
        out_events,
    );

    world.schools.leave(from, mover);
    world.schools.join(into, mover);
    world.creatures[mover_index].set_school(Some(into));
    out_events.push(Event::SchoolsMerged { mover, from, into });

    world.schools.mates(into, mover, &mut mates);
    for index in 0..mates.len() {
        if let Some(mate_index) = world.index_of(mates[index]) {
            change_hit_points(
                world,
                mate_index,
                HitPointChange::Lose(1),
                HitPointCause::SchoolTransfer,
                out_events,
            );
        }
    }

    mates.clear();
    world.mates = mates;
}

/// Pairwise contact damage for the advancing creature. Both matrix entries of
/// a qualifying pair apply, each damaged party's immunity window reopens, and
/// a damaged crawler levies one hit point from every schoolmate. Resting
/// contacts and pairs with an immune side are skipped.
fn contact_phase(world: &mut World, index: usize, out_events: &mut Vec<Event>) {
    for partner_index in 0..world.creatures.len() {
        if partner_index == index {
            continue;
        }
        let advancing = &world.creatures[index];
        if advancing.is_dead() || advancing.is_immune() {
            return;
        }
        let partner = &world.creatures[partner_index];
        if partner.is_dead() || partner.is_immune() {
            continue;
        }

        let own_box = advancing.bbox();
        let partner_box = partner.bbox();
        if !own_box.overlaps(partner_box) {
            continue;
        }
        if collision::stands_on(own_box, partner_box)
            || collision::stands_on(partner_box, own_box)
        {
            continue;
        }

        let own_kind = advancing.kind();
        let partner_kind = partner.kind();
        let to_advancing = combat::contact_damage(partner_kind, own_kind);
        let to_partner = combat::contact_damage(own_kind, partner_kind);

        if to_advancing > 0 {
            change_hit_points(
                world,
                index,
                HitPointChange::Lose(to_advancing),
                HitPointCause::Contact(partner_kind),
                out_events,
            );
            world.creatures[index].reset_immunity();
            school_levy(world, index, out_events);
        }
        if to_partner > 0 {
            change_hit_points(
                world,
                partner_index,
                HitPointChange::Lose(to_partner),
                HitPointCause::Contact(own_kind),
                out_events,
            );
            world.creatures[partner_index].reset_immunity();
            school_levy(world, partner_index, out_events);
        }
    }
}

/// One hit point from every other live schoolmate of a crawler that just
/// took contact damage. The levy does not reopen anyone's immunity window.
fn school_levy(world: &mut World, index: usize, out_events: &mut Vec<Event>) {
    let Some(school) = world.creatures[index].school() else {
        return;
    };
    let levied = world.creatures[index].id();

    let mut mates = mem::take(&mut world.mates);
    world.schools.mates(school, levied, &mut mates);
    for mate_index in 0..mates.len() {
        if let Some(creature_index) = world.index_of(mates[mate_index]) {
            change_hit_points(
                world,
                creature_index,
                HitPointChange::Lose(combat::SCHOOL_LEVY),
                HitPointCause::SchoolLevy,
                out_events,
            );
        }
    }
    mates.clear();
    world.mates = mates;
}

/// A player or rival overlapping a live plant consumes it when the full
/// nourishment fits under the hit-point ceiling: the plant dies and the
/// eater gains the fixed amount. Without the headroom the plant is left
/// untouched.
fn nourish(world: &mut World, index: usize, out_events: &mut Vec<Event>) {
    if !matches!(
        world.creatures[index].kind(),
        EntityKind::Player | EntityKind::Rival
    ) {
        return;
    }
    let body = world.creatures[index].bbox();

    for plant_index in 0..world.creatures.len() {
        let eater = &world.creatures[index];
        if eater
            .hit_points()
            .get()
            .saturating_add(combat::NOURISH_HIT_POINTS)
            > eater.max_hit_points()
        {
            return;
        }

        let plant = &world.creatures[plant_index];
        if plant.kind() != EntityKind::Plant || plant.is_dead() {
            continue;
        }
        if !body.overlaps(plant.bbox()) {
            continue;
        }

        let remaining = plant.hit_points().get();
        change_hit_points(
            world,
            plant_index,
            HitPointChange::Lose(remaining),
            HitPointCause::Nourished,
            out_events,
        );
        change_hit_points(
            world,
            index,
            HitPointChange::Gain(combat::NOURISH_HIT_POINTS),
            HitPointCause::Nourished,
            out_events,
        );
    }
}

/// Removes a creature whose corpse has outlived the grace delay, or that was
/// doomed by leaving the world. A removed player latches the loss.
fn lifecycle(world: &mut World, index: usize, out_events: &mut Vec<Event>) {
    let creature = &world.creatures[index];
    let expired = creature.is_dead() && (creature.grace_expired() || creature.is_doomed());
    if !expired {
        return;
    }

    let entity = creature.id();
    let kind = creature.kind();
    let school = creature.school();
    let _ = world.creatures.remove(index);
    if let Some(school) = school {
        world.schools.leave(school, entity);
    }
    out_events.push(Event::CreatureTerminated { entity, kind });

    if world.player == Some(entity) {
        world.player = None;
        if world.outcome == GameOutcome::InProgress {
            world.outcome = GameOutcome::Lost;
            out_events.push(Event::OutcomeChanged {
                outcome: GameOutcome::Lost,
            });
        }
    }
    if world.rival == Some(entity) {
        world.rival = None;
    }
}

pub mod query {
    //! Read-only access to world state.

    use std::time::Duration;

    use grotto_core::{
        CreatureSnapshot, GameOutcome, HitPoints, SchoolSnapshot, TerrainView, TileCoord,
        ViewportSnapshot,
    };

    use crate::{Creature, TileGrid, World};

    /// Banner greeting players when the experience boots.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// The world's tile grid.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.tile_grid
    }

    /// Borrowed terrain view for presentation layers.
    #[must_use]
    pub fn terrain_view(world: &World) -> TerrainView<'_> {
        TerrainView::new(world.tile_grid.config(), world.tile_grid.terrain())
    }

    /// Every creature in the world, sorted by id.
    #[must_use]
    pub fn creatures(world: &World) -> &[Creature] {
        &world.creatures
    }

    /// Fills `out` with owned records of every creature, in id order.
    pub fn snapshot_creatures(world: &World, out: &mut Vec<CreatureSnapshot>) {
        out.clear();
        for creature in &world.creatures {
            out.push(CreatureSnapshot {
                id: creature.id(),
                kind: creature.kind(),
                position: creature.position(),
                width: creature.width(),
                height: creature.height(),
                facing: creature.facing(),
                hit_points: creature.hit_points(),
                max_hit_points: HitPoints::new(creature.max_hit_points()),
                immune: creature.is_immune(),
                dead: creature.is_dead(),
                ducking: creature.is_ducking(),
                airborne: creature.is_airborne(),
                sprite_index: creature.sprite_index(),
                school: creature.school(),
            });
        }
    }

    /// Fills `out` with the current school membership table.
    pub fn snapshot_schools(world: &World, out: &mut Vec<SchoolSnapshot>) {
        world.schools.snapshot(out);
    }

    /// The visible-window rectangle.
    #[must_use]
    pub fn viewport(world: &World) -> ViewportSnapshot {
        world.viewport.snapshot()
    }

    /// The latched run outcome.
    #[must_use]
    pub fn outcome(world: &World) -> GameOutcome {
        world.outcome
    }

    /// Total simulated time across every tick.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.clock
    }

    /// Whether the run has started.
    #[must_use]
    pub fn started(world: &World) -> bool {
        world.started
    }

    /// The tile the player must reach, when one is marked.
    #[must_use]
    pub fn target_tile(world: &World) -> Option<TileCoord> {
        world.tile_grid.target()
    }
}
